//! The block health/lifecycle taxonomy exposed on the `status` output.

use std::fmt;

/// All errors are local to the block they occur on: the kernel never
/// aborts the scheduler over one, it just forces the block's outputs to
/// `NotActive` and stamps `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Normal,
    Disabled,
    Created,
    Initialized,
    ConfigError,
    InputError,
    BadLink,
    ProcErr,
    ProcessError,
}

impl Status {
    pub fn tag(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Disabled => "disabled",
            Status::Created => "created",
            Status::Initialized => "initialed",
            Status::ConfigError => "config_error",
            Status::InputError => "input_error",
            Status::BadLink => "bad_link",
            Status::ProcErr => "proc_err",
            Status::ProcessError => "process_error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::ConfigError
                | Status::InputError
                | Status::BadLink
                | Status::ProcErr
                | Status::ProcessError
        )
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "normal" => Status::Normal,
            "disabled" => Status::Disabled,
            "created" => Status::Created,
            "initialed" => Status::Initialized,
            "config_error" => Status::ConfigError,
            "input_error" => Status::InputError,
            "bad_link" => Status::BadLink,
            "proc_err" => Status::ProcErr,
            "process_error" => Status::ProcessError,
            _ => return None,
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips() {
        for s in [
            Status::Normal,
            Status::Disabled,
            Status::Created,
            Status::Initialized,
            Status::ConfigError,
            Status::InputError,
            Status::BadLink,
            Status::ProcErr,
            Status::ProcessError,
        ] {
            assert_eq!(Status::from_tag(s.tag()), Some(s));
        }
    }

    #[test]
    fn only_the_error_kinds_report_is_error() {
        assert!(!Status::Normal.is_error());
        assert!(!Status::Disabled.is_error());
        assert!(Status::ConfigError.is_error());
        assert!(Status::ProcErr.is_error());
    }
}
