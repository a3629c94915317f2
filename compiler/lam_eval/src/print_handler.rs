//! Where `print` and `println` write.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

/// Output destination of the print host functions.
pub enum PrintHandler {
    Stdout,
    /// Accumulates everything written, for tests and embedders.
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandler {
    pub fn println(&self, text: &str) {
        self.write(text, true);
    }

    pub fn print(&self, text: &str) {
        self.write(text, false);
    }

    fn write(&self, text: &str, newline: bool) {
        match self {
            PrintHandler::Stdout => {
                let mut out = std::io::stdout().lock();
                let result = if newline {
                    writeln!(out, "{text}")
                } else {
                    write!(out, "{text}").and_then(|()| out.flush())
                };
                if let Err(err) = result {
                    warn!(error = %err, "failed to write program output");
                }
            }
            PrintHandler::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(text);
                if newline {
                    buffer.push('\n');
                }
            }
            PrintHandler::Silent => {}
        }
    }

    /// Captured output; always empty unless this is a buffer.
    pub fn captured(&self) -> String {
        match self {
            PrintHandler::Buffer(buffer) => buffer.lock().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let PrintHandler::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::default()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}

#[cfg(test)]
mod tests {
    use super::{buffer_handler, silent_handler, stdout_handler};

    #[test]
    fn buffer_keeps_print_and_println_apart() {
        let handler = buffer_handler();
        handler.print("a");
        handler.print("b");
        handler.println(" c");
        assert_eq!(handler.captured(), "ab c\n");
    }

    #[test]
    fn clear_empties_the_buffer() {
        let handler = buffer_handler();
        handler.println("gone");
        handler.clear();
        assert_eq!(handler.captured(), "");
    }

    #[test]
    fn non_buffers_capture_nothing() {
        let silent = silent_handler();
        silent.println("dropped");
        assert_eq!(silent.captured(), "");
        assert_eq!(stdout_handler().captured(), "");
    }
}
