#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateChangeError {
    InvalidIndex,
    LimitReached,
    StateUnchanged,
    InvalidCaller,
}
