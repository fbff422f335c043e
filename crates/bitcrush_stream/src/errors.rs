#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("BitStream capacity exceeded. End bit position: {end}, Capacity: {capacity}")]
    #[diagnostic(
        code(bitcrush::stream::capacity_exceeded),
        help("The write would not fit the inline buffer. Pick a larger BitStream capacity or split the message.")
    )]
    CapacityExceeded { end: usize, capacity: usize },

    #[error("Not enough bits. Requested: {requested}, Remaining: {remaining}")]
    #[diagnostic(
        code(bitcrush::stream::not_enough_bits),
        help("Reads cannot overtake the write cursor. The reader expects more fields than were written.")
    )]
    NotEnoughBits { requested: usize, remaining: usize },

    #[error("Source too short. Requested: {requested} bits, Available: {available} bits")]
    #[diagnostic(
        code(bitcrush::stream::source_too_short),
        help("The bit count passed alongside the source is larger than the source itself.")
    )]
    SourceTooShort { requested: usize, available: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    IO(#[from] bitcrush_io::Error),
}
