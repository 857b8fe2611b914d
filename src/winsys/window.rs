pub type Window = u32;

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum IcccmWindowState {
    Withdrawn,
    Normal,
    Iconic,
}
