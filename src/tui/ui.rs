use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::core::hub::Hub;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::hub_overlay::OVERLAY_CHROME_HEIGHT;
use crate::tui::components::{HubOverlay, StatusBar};

/// Display slots that fit in `height` rows, never more than `preferred`.
pub fn fit_capacity(preferred: usize, height: u16) -> usize {
    preferred.min(height.saturating_sub(OVERLAY_CHROME_HEIGHT) as usize)
}

pub fn draw_ui(frame: &mut Frame, hub: &mut Hub, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0)]);
    let [status_area, main_area] = layout.areas(frame.area());

    let capacity = fit_capacity(tui.preferred_capacity, main_area.height);
    tui.overlay.set_capacity(capacity);

    let hub_frame = hub.render(capacity);
    let listening = hub_frame.as_ref().and_then(|f| f.listening.clone());

    match &hub_frame {
        Some(hub_frame) => HubOverlay::new(&mut tui.overlay, hub_frame).render(frame, main_area),
        None => draw_landing(frame, main_area, hub.is_open()),
    }

    StatusBar::new(hub.pages().len(), tui.status_message.clone(), listening).render(frame, status_area);
}

fn draw_landing(frame: &mut Frame, area: Rect, is_open: bool) {
    let hint = if is_open {
        "Terminal too small for the settings hub"
    } else {
        "Press F2 to open the settings hub"
    };
    let lines = vec![
        Line::from(hint),
        Line::from("q or Ctrl+C quits").style(Style::default().fg(Color::DarkGray)),
    ];
    let [_, center, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(lines.len() as u16),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), center);
}
