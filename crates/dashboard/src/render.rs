//! Output sinks for assembled dashboards.

use std::io::Write;

use crate::chart::Dashboard;
use crate::error::Result;

/// Consumer of a finished dashboard description.
pub trait RenderSink {
    fn render(&mut self, dashboard: &Dashboard) -> Result<()>;
}

/// Writes each dashboard as one JSON document.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    /// Compact JSON, one document per line.
    pub fn new(writer: W) -> Self {
        Self { writer, pretty: false }
    }

    /// Indented JSON.
    pub fn pretty(writer: W) -> Self {
        Self { writer, pretty: true }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn render(&mut self, dashboard: &Dashboard) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, dashboard)?;
        } else {
            serde_json::to_writer(&mut self.writer, dashboard)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        tracing::debug!(title = %dashboard.title, panels = dashboard.panels.len(), "dashboard written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Axis, Chart, Panel, Theme, XyChart, XySeries};

    fn dashboard() -> Dashboard {
        let mut d = Dashboard::new("Temperature", 1, 1, Theme::Dark).unwrap();
        let series = XySeries::line("Temperature", vec![0.0, 1.0], vec![1.0, 2.0]).unwrap();
        let chart = XyChart::new(Axis::linear("x"), Axis::linear("y")).with_series(series);
        d.add(Panel::at(0, 0, "Temperature", Chart::Xy(chart))).unwrap();
        d
    }

    #[test]
    fn test_json_sink_round_trips() {
        let mut sink = JsonSink::new(Vec::new());
        sink.render(&dashboard()).unwrap();
        let bytes = sink.into_inner();
        assert_eq!(bytes.last(), Some(&b'\n'));
        let back: Dashboard = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, dashboard());
    }

    #[test]
    fn test_pretty_is_multiline() {
        let mut sink = JsonSink::pretty(Vec::new());
        sink.render(&dashboard()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.lines().count() > 5);
    }
}
