use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("day {day} is outside the displayed range {first}..={last}")]
    DayOutOfRange { day: i32, first: i32, last: i32 },

    #[error("signal for day {day} has a non-finite {field}")]
    NonFiniteInput { day: i32, field: &'static str },
}
