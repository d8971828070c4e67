//! Status bar widget - live settings, sweep mode and pending edits

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_ecg::scroll::ScrollEngine;

use super::Draft;

fn flag(label: &str, on: bool) -> Span<'static> {
    let color = if on { Color::Green } else { Color::DarkGray };
    Span::styled(format!("{label} "), Style::default().fg(color))
}

/// Render the status bar
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    engine: &ScrollEngine,
    draft: &Draft,
    notice: Option<&str>,
) {
    let block = Block::default().title(" ecg ").borders(Borders::ALL);

    let live = engine.config();
    let state = engine.generator_state();
    let mode = if engine.is_first_sweep() {
        "Sweep"
    } else {
        "Continuous"
    };

    let mut spans = vec![
        Span::styled(
            format!(" HR: {:.0}  ", live.heart_rate),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!(
                "{mode} x={:.0} @ {:.0}/s  ",
                engine.pointer(),
                engine.pixels_per_second()
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Beats {}  Sweeps {}  ", state.beat_counter, engine.sweeps()),
            Style::default().fg(Color::DarkGray),
        ),
        flag("R-burst", live.r_pattern.enabled),
        flag("P-burst", live.p_pattern.enabled),
        flag("Custom", live.custom.is_active()),
    ];

    if draft.is_pending(live) {
        spans.push(Span::styled(
            format!(" | draft HR {:.0} (Enter to apply)", draft.config().heart_rate),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(notice) = notice {
        spans.push(Span::styled(
            format!(" | {notice}"),
            Style::default().fg(Color::Red),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
