//! Single-line status area: the outcome of whichever operation finished last.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Info,
    Ok,
    Err,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusLine {
    pub fn set(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.kind = kind;
        self.text = text.into();
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set(StatusKind::Info, text);
    }

    pub fn ok(&mut self, text: impl Into<String>) {
        self.set(StatusKind::Ok, text);
    }

    pub fn err(&mut self, text: impl Into<String>) {
        self.set(StatusKind::Err, text);
    }
}
