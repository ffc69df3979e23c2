#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    SelectView(usize),
    CycleSort,
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollTop,
    None,
}
