//! Why a given tick ran.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMethod {
    Timer,
    ExecIn,
    InputChange,
    Manual,
}

impl ExecMethod {
    pub fn tag(&self) -> &'static str {
        match self {
            ExecMethod::Timer => "timer",
            ExecMethod::ExecIn => "exec_in",
            ExecMethod::InputChange => "input_change",
            ExecMethod::Manual => "manual",
        }
    }
}

impl fmt::Display for ExecMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
