/// A user interaction. Each one maps to exactly one controller transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Submit(String),
    Edit(usize),
    Cancel,
    Confirm(String),
    Retry,
    Listen(usize),
}

/// What a dispatched action produced besides the session mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Updated,
    Reply(String),
    Audio(Vec<u8>),
}
