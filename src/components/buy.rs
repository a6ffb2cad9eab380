//! Buy component: pick a package (or custom amounts), receiving addresses and
//! the fee currency, then submit the purchase.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::sync::mpsc::UnboundedSender;

use tc_gas_station::domain::{
    package::{Currency, PayType},
    session::{PurchaseSession, SessionState},
    validation::FormField,
};

use crate::{action::Action, tui::Frame};

use super::Component;

const DISCLAIMER: &str = "Disclaimer: TC is sold only for users to pay gas fees to use the \
utilities of dapps on TC network (including but not limited to bridging, swapping, creating \
artifacts, issuing BRC-20 tokens, issuing BRC-721 NFTs, deploying smart contracts, and \
preserving files), NOT to raise funds. Each wallet is capped at 100 TC. And lastly, US \
citizens are prohibited from purchasing TC at this time.";

/// Focusable parts of the buy form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyFocus {
    PayType,
    Packages,
    Input(FormField),
    Submit,
}

impl BuyFocus {
    fn is_input(&self) -> bool {
        matches!(self, BuyFocus::Input(_))
    }
}

pub struct BuyComponent {
    action_tx: UnboundedSender<Action>,
    pub session: PurchaseSession,
    pub focus: BuyFocus,
    pub is_editing: bool,
    pub is_loading: bool,
    pub load_error: Option<String>,
    package_cursor: usize,
}

impl BuyComponent {
    pub fn new(action_tx: UnboundedSender<Action>, session: PurchaseSession) -> Self {
        Self {
            action_tx,
            session,
            focus: BuyFocus::PayType,
            is_editing: false,
            is_loading: false,
            load_error: None,
            package_cursor: 0,
        }
    }

    /// Focus stops for the fields currently on screen.
    pub fn focus_order(&self) -> Vec<BuyFocus> {
        let derived = self.session.derived();
        let mut order = vec![BuyFocus::PayType];
        if derived.show_packages {
            order.push(BuyFocus::Packages);
        }
        if derived.show_amount_tc {
            order.push(BuyFocus::Input(FormField::AmountTc));
        }
        if derived.show_amount_btc {
            order.push(BuyFocus::Input(FormField::AmountBtc));
        }
        if derived.show_amount_wbtc {
            order.push(BuyFocus::Input(FormField::AmountWbtc));
        }
        order.push(BuyFocus::Input(FormField::ToAddress));
        if derived.show_btc_address {
            order.push(BuyFocus::Input(FormField::ToBtcAddress));
        }
        order.push(BuyFocus::Submit);
        order
    }

    /// Sync the package cursor after the catalog was (re)loaded.
    pub fn packages_loaded(&mut self) {
        self.is_loading = false;
        self.load_error = None;
        self.package_cursor = self.session.selected_index().unwrap_or(0);
        self.ensure_focus_visible();
    }

    pub fn paste(&mut self, text: &str) {
        if let BuyFocus::Input(field) = self.focus {
            let mut value = self.session.values().get(field).to_string();
            value.push_str(text.trim());
            self.session.set_field(field, value);
        }
    }

    fn move_focus(&mut self, forward: bool) {
        if self.is_editing {
            self.stop_editing();
        }
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn ensure_focus_visible(&mut self) {
        if !self.focus_order().contains(&self.focus) {
            self.is_editing = false;
            self.focus = BuyFocus::Submit;
        }
    }

    fn stop_editing(&mut self) {
        self.is_editing = false;
        if let BuyFocus::Input(field) = self.focus {
            self.session.blur(field);
        }
    }

    fn cycle(&mut self, forward: bool) {
        match self.focus {
            BuyFocus::PayType => {
                let n = PayType::ALL.len();
                let current = self
                    .session
                    .values()
                    .pay_type
                    .and_then(|pt| PayType::ALL.iter().position(|p| *p == pt));
                let next = match current {
                    None => 0,
                    Some(i) if forward => (i + 1) % n,
                    Some(i) => (i + n - 1) % n,
                };
                self.session.select_pay_type(PayType::ALL[next]);
            }
            BuyFocus::Packages => {
                let n = self.session.catalog().len();
                if n == 0 {
                    return;
                }
                self.package_cursor = if forward {
                    (self.package_cursor + 1) % n
                } else {
                    (self.package_cursor + n - 1) % n
                };
                self.session.select_package(self.package_cursor);
            }
            _ => {}
        }
    }

    fn handle_char(&mut self, field: FormField, c: char) {
        let mut value = self.session.values().get(field).to_string();
        if field.is_amount() {
            // Only allow digits and a single decimal point
            if !(c.is_ascii_digit() || (c == '.' && !value.contains('.'))) {
                return;
            }
        }
        value.push(c);
        self.session.set_field(field, value);
    }

    fn handle_backspace(&mut self, field: FormField) {
        let mut value = self.session.values().get(field).to_string();
        value.pop();
        self.session.set_field(field, value);
    }

    fn field_title(field: FormField) -> &'static str {
        match field {
            FormField::AmountTc => "How many TC would you like to receive?",
            FormField::AmountBtc => "How many BTC would you like to receive?",
            FormField::AmountWbtc => "How many WBTC would you like to receive?",
            FormField::ToAddress => "Receiving TC Wallet Address",
            FormField::ToBtcAddress => "Receiving BTC Wallet Address",
        }
    }

    fn field_placeholder(field: FormField) -> &'static str {
        match field {
            FormField::AmountTc | FormField::AmountBtc | FormField::AmountWbtc => "Amount",
            FormField::ToAddress => "Paste your TC wallet address here (0x1234...2345).",
            FormField::ToBtcAddress => "Paste your BTC wallet address here.",
        }
    }

    fn border_style(focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn draw_input(&self, f: &mut Frame, area: Rect, field: FormField) {
        let focused = self.focus == BuyFocus::Input(field);
        let value = self.session.values().get(field);

        let mut spans = Vec::new();
        if value.is_empty() && !(focused && self.is_editing) {
            spans.push(Span::styled(
                Self::field_placeholder(field),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            let mut display = value.to_string();
            if focused && self.is_editing {
                display.push('│');
            }
            let style = if focused && self.is_editing {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(display, style));
        }

        let mut lines = vec![Line::from(spans)];
        if let Some(err) = self.session.visible_error(field) {
            lines.push(Line::from(Span::styled(err, Style::default().fg(Color::Red))));
        }

        let prefix = if focused { "> " } else { "  " };
        let widget = Paragraph::new(lines).block(
            Block::default()
                .title(format!("{}{}", prefix, Self::field_title(field)))
                .borders(Borders::ALL)
                .border_style(Self::border_style(focused)),
        );
        f.render_widget(widget, area);
    }

    fn draw_pay_types(&self, f: &mut Frame, area: Rect) {
        let focused = self.focus == BuyFocus::PayType;
        let selected = self.session.values().pay_type;
        let mut spans = vec![Span::raw(" ")];
        for pt in PayType::ALL {
            let style = if Some(pt) == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} ", pt.label()), style));
            spans.push(Span::raw("  "));
        }

        let widget = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(if focused { "> Pay with" } else { "  Pay with" })
                .borders(Borders::ALL)
                .border_style(Self::border_style(focused)),
        );
        f.render_widget(widget, area);
    }

    fn draw_packages(&self, f: &mut Frame, area: Rect) {
        let focused = self.focus == BuyFocus::Packages;
        let catalog = self.session.catalog();
        let selected = self.session.selected_index();

        let items: Vec<ListItem> = catalog
            .packages
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let marker = if Some(i) == selected { "(*) " } else { "( ) " };
                let mut spans = vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::styled(format!("{:<12}", p.title), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("{} TC", p.amount(Currency::Tc)),
                        Style::default().fg(Color::Cyan),
                    ),
                ];
                if p.unlocks_btc() {
                    spans.push(Span::raw(" + "));
                    spans.push(Span::styled(
                        format!("{} BTC", p.amount(Currency::Btc)),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                if p.unlocks_wbtc() {
                    spans.push(Span::raw(" + "));
                    spans.push(Span::styled(
                        format!("{} WBTC", p.amount(Currency::Wbtc)),
                        Style::default().fg(Color::Magenta),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let title = if self.is_loading {
            "  Packages (loading...)".to_string()
        } else if let Some(err) = &self.load_error {
            format!("  Packages (failed: {}) [r] Retry", err)
        } else if focused {
            "> Packages  [←/→] Select  [c] Custom amount".to_string()
        } else {
            "  Packages  [c] Custom amount".to_string()
        };

        let mut list_state = ListState::default();
        list_state.select(selected);
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Self::border_style(focused)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD));
        f.render_stateful_widget(list, area, &mut list_state);
    }

    pub fn draw_form(&self, f: &mut Frame, area: Rect) {
        let derived = self.session.derived();
        let order = self.focus_order();

        let mut constraints = vec![Constraint::Length(3)];
        if derived.show_packages {
            let rows = self.session.catalog().len().max(1) as u16;
            constraints.push(Constraint::Length(rows + 2));
        }
        let inputs: Vec<FormField> = order
            .iter()
            .filter_map(|f| match f {
                BuyFocus::Input(field) => Some(*field),
                _ => None,
            })
            .collect();
        constraints.extend(inputs.iter().map(|_| Constraint::Length(4)));
        constraints.push(Constraint::Length(3)); // Fee + submit
        constraints.push(Constraint::Min(0)); // Status + disclaimer

        let chunks = Layout::vertical(constraints).split(area);
        let mut idx = 0;

        self.draw_pay_types(f, chunks[idx]);
        idx += 1;

        if derived.show_packages {
            self.draw_packages(f, chunks[idx]);
            idx += 1;
        }

        for field in inputs {
            self.draw_input(f, chunks[idx], field);
            idx += 1;
        }

        let submit_focused = self.focus == BuyFocus::Submit;
        let submit_style = if self.session.is_processing() {
            Style::default().fg(Color::DarkGray)
        } else if submit_focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        let submit = Paragraph::new(Line::from(vec![
            Span::styled("Network fees: ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.session.fee_label(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled(format!("[ {} ]", self.session.submit_label()), submit_style),
        ]))
        .block(
            Block::default()
                .title(if submit_focused { "> Confirm" } else { "  Confirm" })
                .borders(Borders::ALL)
                .border_style(Self::border_style(submit_focused)),
        );
        f.render_widget(submit, chunks[idx]);
        idx += 1;

        let mut lines = Vec::new();
        match self.session.state() {
            SessionState::Succeeded => lines.push(Line::from(Span::styled(
                "Purchase submitted.",
                Style::default().fg(Color::Green),
            ))),
            SessionState::Failed(msg) => lines.push(Line::from(Span::styled(
                format!("Error: {}", msg),
                Style::default().fg(Color::Red),
            ))),
            _ => {}
        }
        lines.push(Line::from(Span::styled(
            if self.is_editing {
                "[Esc] Stop editing  [↓/↑] Next/prev field"
            } else {
                "[Enter] Edit/confirm  [↓/↑] Field  [←/→] Choose  [c] Custom amount  [r] Reload"
            },
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            DISCLAIMER,
            Style::default().fg(Color::DarkGray),
        )));

        let status = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(status, chunks[idx]);
    }
}

impl Component for BuyComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Down | KeyCode::Tab => self.move_focus(true),
            KeyCode::Up | KeyCode::BackTab => self.move_focus(false),
            KeyCode::Left => self.cycle(false),
            KeyCode::Right => self.cycle(true),
            KeyCode::Esc => self.stop_editing(),
            KeyCode::Enter => match self.focus {
                BuyFocus::Submit => {
                    if !self.session.is_processing() {
                        self.action_tx.send(Action::SubmitPurchase)?;
                    }
                }
                focus if focus.is_input() => {
                    if self.is_editing {
                        self.stop_editing();
                    } else {
                        self.is_editing = true;
                    }
                }
                _ => self.move_focus(true),
            },
            KeyCode::Char(c) => match self.focus {
                BuyFocus::Input(field) if self.is_editing => self.handle_char(field, c),
                _ => match c {
                    'j' => self.move_focus(true),
                    'k' => self.move_focus(false),
                    'h' => self.cycle(false),
                    'l' => self.cycle(true),
                    'c' => {
                        self.session.toggle_custom_package();
                        self.ensure_focus_visible();
                    }
                    'r' => self.action_tx.send(Action::LoadPackages)?,
                    'e' if self.focus.is_input() => self.is_editing = true,
                    _ => {}
                },
            },
            KeyCode::Backspace => {
                if let BuyFocus::Input(field) = self.focus
                    && self.is_editing
                {
                    self.handle_backspace(field);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.draw_form(f, area);
    }
}
