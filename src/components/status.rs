//! Check-status component: look up purchases for a TC address.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use tokio::sync::mpsc::UnboundedSender;

use tc_gas_station::domain::{history::TABLE_HEADINGS, status::StatusSession};

use crate::{action::Action, tui::Frame};

use super::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFocus {
    Address,
    Check,
}

pub struct StatusComponent {
    action_tx: UnboundedSender<Action>,
    pub session: StatusSession,
    pub focus: StatusFocus,
    pub is_editing: bool,
}

impl StatusComponent {
    pub fn new(action_tx: UnboundedSender<Action>, session: StatusSession) -> Self {
        Self {
            action_tx,
            session,
            focus: StatusFocus::Address,
            is_editing: false,
        }
    }

    pub fn paste(&mut self, text: &str) {
        if self.focus == StatusFocus::Address {
            let address = format!("{}{}", self.session.address, text.trim());
            self.session.set_address(address);
        }
    }

    fn toggle_focus(&mut self) {
        self.is_editing = false;
        self.focus = match self.focus {
            StatusFocus::Address => StatusFocus::Check,
            StatusFocus::Check => StatusFocus::Address,
        };
    }

    fn draw_table(&self, f: &mut Frame, area: Rect) {
        let header = Row::new(TABLE_HEADINGS.iter().map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
        }));

        let rows = self.session.current_page_rows().iter().map(|row| {
            let cells = row.cells();
            Row::new([
                Cell::from(cells[0].to_string()).style(Style::default().fg(Color::Cyan)),
                Cell::from(cells[1].to_string()),
                Cell::from(cells[2].to_string()),
                Cell::from(cells[3].to_string()),
                Cell::from(cells[4].to_string()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(cells[5].to_string()).style(Style::default().fg(Color::Yellow)),
            ])
        });

        let widths = [
            Constraint::Min(16),
            Constraint::Length(18),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(18),
            Constraint::Length(14),
        ];

        let title = format!(
            "History ({} records, page {}/{})  [/] Page",
            self.session.rows().len(),
            self.session.page() + 1,
            self.session.page_count()
        );
        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(table, area);
    }
}

impl Component for StatusComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Down | KeyCode::Up | KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
            KeyCode::Esc => self.is_editing = false,
            KeyCode::Enter => match self.focus {
                StatusFocus::Address => self.is_editing = !self.is_editing,
                StatusFocus::Check => {
                    if !self.session.is_processing() {
                        self.action_tx.send(Action::CheckStatus)?;
                    }
                }
            },
            KeyCode::PageDown => self.session.next_page(),
            KeyCode::PageUp => self.session.prev_page(),
            KeyCode::Char(c) if self.is_editing => {
                let address = format!("{}{}", self.session.address, c);
                self.session.set_address(address);
            }
            KeyCode::Char(c) => match c {
                ']' => self.session.next_page(),
                '[' => self.session.prev_page(),
                'j' | 'k' => self.toggle_focus(),
                'e' if self.focus == StatusFocus::Address => self.is_editing = true,
                _ => {}
            },
            KeyCode::Backspace if self.is_editing => {
                let mut address = self.session.address.clone();
                address.pop();
                self.session.set_address(address);
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(4), // Address
            Constraint::Length(3), // Check button
            Constraint::Min(0),    // Table
        ])
        .split(area);

        let focused = self.focus == StatusFocus::Address;
        let address_line = if self.session.address.is_empty() && !self.is_editing {
            Line::from(Span::styled(
                "Paste your TC wallet address here (0x1234...2345).",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let mut display = self.session.address.clone();
            if self.is_editing {
                display.push('│');
            }
            Line::from(Span::styled(display, Style::default().fg(Color::White)))
        };
        let mut lines = vec![address_line];
        if let Some(err) = self.session.visible_error() {
            lines.push(Line::from(Span::styled(err, Style::default().fg(Color::Red))));
        }
        let address_widget = Paragraph::new(lines).block(
            Block::default()
                .title(if focused {
                    "> TC Wallet Address"
                } else {
                    "  TC Wallet Address"
                })
                .borders(Borders::ALL)
                .border_style(if focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                }),
        );
        f.render_widget(address_widget, chunks[0]);

        let check_focused = self.focus == StatusFocus::Check;
        let label = if self.session.is_processing() {
            "[ Checking... ]"
        } else {
            "[ Check ]"
        };
        let mut spans = vec![Span::styled(
            label,
            if check_focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            },
        )];
        if let Some(err) = self.session.last_error() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("Lookup failed: {}", err),
                Style::default().fg(Color::Red),
            ));
        }
        let check_widget = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title("Check status")
                .borders(Borders::ALL)
                .border_style(if check_focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                }),
        );
        f.render_widget(check_widget, chunks[1]);

        self.draw_table(f, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_address_and_checking() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut c = StatusComponent::new(tx, StatusSession::default());

        c.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(c.is_editing);
        for ch in "0x12".chars() {
            c.handle_key_event(key(KeyCode::Char(ch))).unwrap();
        }
        assert_eq!(c.session.address, "0x12");
        assert_eq!(c.session.visible_error(), Some("Invalid TC wallet address."));

        c.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(c.focus, StatusFocus::Check);
        c.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Action::CheckStatus);
    }
}
