use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::application::dtos::view_models::{ResultView, StatsView};
use crate::application::ports::view_ports::{FormField, Notice, NoticeLevel, PredictionView, StatusIndicator};
use crate::application::services::cascade_service::CascadeSnapshot;
use crate::interfaces::view::text_renderer;

/// Terminal implementation of the prediction view
///
/// Output goes to any writer; the CLI uses stdout.
pub struct ConsoleView {
    out: Mutex<Box<dyn Write + Send>>,
    verbose: bool,
}

impl ConsoleView {
    pub fn stdout(verbose: bool) -> Self {
        Self::with_writer(Box::new(io::stdout()), verbose)
    }

    /// `verbose` also prints selector and loading changes
    pub fn with_writer(out: Box<dyn Write + Send>, verbose: bool) -> Self {
        Self {
            out: Mutex::new(out),
            verbose,
        }
    }

    fn write_lines<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        for line in lines {
            if let Err(e) = writeln!(out, "{}", line.as_ref()) {
                tracing::warn!("Console write failed: {}", e);
                return;
            }
        }
        let _ = out.flush();
    }
}

impl PredictionView for ConsoleView {
    fn set_airline_options(&self, options: &[(String, String)]) {
        if self.verbose {
            self.write_lines(options.iter().map(|(code, name)| format!("  {}  {}", code, name)));
        }
    }

    fn render_selectors(&self, snapshot: &CascadeSnapshot) {
        if self.verbose {
            self.write_lines(text_renderer::render_selectors(snapshot));
        }
    }

    fn set_loading(&self, loading: bool) {
        if self.verbose && loading {
            self.write_lines(["..."]);
        }
    }

    fn set_submit_enabled(&self, _enabled: bool) {}

    fn show_result(&self, view: &ResultView) {
        self.write_lines(text_renderer::render_result(view));
    }

    fn hide_result(&self) {}

    fn show_stats(&self, view: &StatsView) {
        self.write_lines(text_renderer::render_stats(view));
    }

    fn set_status(&self, status: StatusIndicator, label: &str) {
        let dot = match status {
            StatusIndicator::Operational => "●",
            StatusIndicator::Limited => "○",
        };
        self.write_lines([format!("{} {}", dot, label)]);
    }

    fn notify(&self, notice: Notice) {
        let prefix = match notice.level {
            NoticeLevel::Info => "",
            NoticeLevel::Warning => "[warning] ",
            NoticeLevel::Error => "[error] ",
        };
        self.write_lines(notice.message.lines().enumerate().map(|(i, line)| {
            if i == 0 {
                format!("{}{}", prefix, line)
            } else {
                line.to_string()
            }
        }));
    }

    fn focus(&self, field: FormField) {
        if self.verbose {
            self.write_lines([format!("> {:?}", field)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_notice_and_status_output() {
        let buf = SharedBuf::default();
        let view = ConsoleView::with_writer(Box::new(buf.clone()), false);

        view.notify(Notice::error("first\nsecond").for_field(FormField::Origin));
        view.set_status(StatusIndicator::Limited, "Limited Mode");
        view.render_selectors(&CascadeSnapshot::default());

        assert_eq!(buf.text(), "[error] first\nsecond\n○ Limited Mode\n");
    }

    #[test]
    fn test_verbose_prints_selectors() {
        let buf = SharedBuf::default();
        let view = ConsoleView::with_writer(Box::new(buf.clone()), true);
        view.render_selectors(&CascadeSnapshot {
            airline: Some("9E".into()),
            origin_options: vec!["JFK".into()],
            enabled: true,
            ..Default::default()
        });
        assert!(buf.text().starts_with("airline [9E]\norigin [-] JFK\n"));
    }
}
