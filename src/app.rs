use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use tc_gas_station::{
    config::Config,
    domain::{
        session::{PurchaseSession, SubmitOutcome},
        status::StatusSession,
    },
    infra::gas_station::{GasStationApi, HttpGasStation},
};

use crate::{
    action::Action,
    cli::Args,
    components::{Component, buy::BuyComponent, status::StatusComponent},
    tui::{Event, Tui},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Buy,
    Status,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Buy, Tab::Status];

    pub fn title(&self) -> Line<'static> {
        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        match self {
            Tab::Buy => Line::from(vec![Span::styled("B", key), Span::raw("uy TC")]),
            Tab::Status => Line::from(vec![Span::styled("S", key), Span::raw("tatus")]),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Buy => 0,
            Tab::Status => 1,
        }
    }

    pub fn other(&self) -> Tab {
        match self {
            Tab::Buy => Tab::Status,
            Tab::Status => Tab::Buy,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub should_suspend: bool,
    pub config: Config,
    pub active_tab: Tab,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    pub tui: Tui,
    pub api: Arc<dyn GasStationApi>,
    pub buy_component: BuyComponent,
    pub status_component: StatusComponent,
    pub status_message: String,
}

impl App {
    pub fn new(args: &Args, config: Config) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let api: Arc<dyn GasStationApi> = Arc::new(HttpGasStation::new(&config.api)?);

        let buy_component = BuyComponent::new(
            action_tx.clone(),
            PurchaseSession::new(config.network.btc_network),
        );
        let status_component = StatusComponent::new(
            action_tx.clone(),
            StatusSession::new(config.history.page_size),
        );

        let tui = Tui::new()?
            .tick_rate(args.tick_rate)
            .frame_rate(args.frame_rate);

        Ok(Self {
            should_quit: false,
            should_suspend: false,
            config,
            active_tab: Tab::Buy,
            action_tx,
            action_rx,
            tui,
            api,
            buy_component,
            status_component,
            status_message: "Ready".to_string(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        self.action_tx.send(Action::LoadPackages)?;

        loop {
            if let Some(event) = self.tui.next().await {
                self.handle_event(event)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.handle_action(action)?;
            }

            if self.should_suspend {
                self.tui.suspend()?;
                self.should_suspend = false;
                self.tui.resume()?;
            }

            if self.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick => self.action_tx.send(Action::Tick)?,
            Event::Render => self.draw_ui()?,
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
            Event::Paste(text) => match self.active_tab {
                Tab::Buy => self.buy_component.paste(&text),
                Tab::Status => self.status_component.paste(&text),
            },
            Event::Init => info!("Application initialized"),
            Event::Error => {
                self.action_tx
                    .send(Action::Error("Terminal input error".to_string()))?;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.action_tx.send(Action::Quit)?;
            return Ok(());
        }

        let is_editing = match self.active_tab {
            Tab::Buy => self.buy_component.is_editing,
            Tab::Status => self.status_component.is_editing,
        };
        if is_editing {
            return self.forward_key(key);
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::Quit)?;
            }
            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.action_tx.send(Action::Suspend)?;
            }
            KeyCode::Char('b') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::TabBuy)?;
            }
            KeyCode::Char('s') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::TabStatus)?;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.active_tab = self.active_tab.other();
            }
            _ => self.forward_key(key)?,
        }
        Ok(())
    }

    fn forward_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.active_tab {
            Tab::Buy => self.buy_component.handle_key_event(key),
            Tab::Status => self.status_component.handle_key_event(key),
        }
    }

    fn handle_action(&mut self, action: Action) -> Result<()> {
        if action != Action::Tick {
            debug!("Handling action: {}", action);
        }
        match action {
            Action::Tick | Action::Resize(..) => {}
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Error(msg) => {
                warn!("{}", msg);
                self.status_message = msg;
            }
            Action::TabBuy => self.active_tab = Tab::Buy,
            Action::TabStatus => self.active_tab = Tab::Status,
            Action::LoadPackages => {
                if self.buy_component.is_loading {
                    return Ok(());
                }
                self.buy_component.is_loading = true;
                self.status_message = "Loading packages...".to_string();

                let api = Arc::clone(&self.api);
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = api.fetch_package_list().await.map_err(|e| e.to_string());
                    if tx.send(Action::PackagesLoaded(result)).is_err() {
                        debug!("Package list arrived after shutdown");
                    }
                });
            }
            Action::PackagesLoaded(Ok(packages)) => {
                info!("Loaded {} packages", packages.len());
                self.buy_component.session.load_packages(packages);
                self.buy_component.packages_loaded();
                self.status_message = format!(
                    "{} packages available",
                    self.buy_component.session.catalog().len()
                );
            }
            Action::PackagesLoaded(Err(e)) => {
                warn!("Failed to load packages: {}", e);
                self.buy_component.is_loading = false;
                self.status_message = format!("Failed to load packages: {}", e);
                self.buy_component.load_error = Some(e);
            }
            Action::SubmitPurchase => match self.buy_component.session.begin_submit() {
                SubmitOutcome::Ready(payload) => {
                    info!(
                        "Submitting purchase for {} (package {:?}, custom: {})",
                        payload.values.to_address,
                        payload.values.selected_package.as_ref().map(|p| p.id),
                        payload.values.is_custom_package
                    );
                    self.status_message = "Processing...".to_string();

                    let api = Arc::clone(&self.api);
                    let tx = self.action_tx.clone();
                    tokio::spawn(async move {
                        let result = api
                            .submit_purchase(&payload)
                            .await
                            .map_err(|e| e.to_string());
                        if tx.send(Action::PurchaseFinished(result)).is_err() {
                            debug!("Purchase result arrived after shutdown");
                        }
                    });
                }
                SubmitOutcome::Invalid(errors) => {
                    debug!("Purchase form invalid: {:?}", errors);
                    self.status_message = format!("Please fix {} field(s)", errors.len());
                }
                SubmitOutcome::InFlight => {
                    debug!("Purchase already in flight");
                }
            },
            Action::PurchaseFinished(result) => {
                match &result {
                    Ok(()) => {
                        info!("Purchase submitted");
                        self.status_message = "Purchase submitted".to_string();
                    }
                    Err(e) => {
                        warn!("Purchase failed: {}", e);
                        self.status_message = format!("Purchase failed: {}", e);
                    }
                }
                self.buy_component.session.finish_submit(result);
            }
            Action::CheckStatus => {
                let Some(address) = self.status_component.session.begin_lookup() else {
                    return Ok(());
                };
                self.status_message = format!("Checking {}...", address);

                let api = Arc::clone(&self.api);
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = api
                        .fetch_purchase_history(&address)
                        .await
                        .map_err(|e| e.to_string());
                    if tx.send(Action::HistoryLoaded(result)).is_err() {
                        debug!("History arrived after shutdown");
                    }
                });
            }
            Action::HistoryLoaded(result) => {
                match &result {
                    Ok(records) => {
                        self.status_message = format!("Found {} purchases", records.len());
                    }
                    Err(e) => {
                        warn!("History lookup failed: {}", e);
                        self.status_message = format!("History lookup failed: {}", e);
                    }
                }
                self.status_component.session.finish_lookup(result);
            }
        }
        Ok(())
    }

    fn draw_ui(&mut self) -> Result<()> {
        let network = self.config.network.name.clone();
        let api_url = self.config.api.base_url.clone();
        let active_tab = self.active_tab;
        let status_message = self.status_message.clone();
        let buy = &mut self.buy_component;
        let status = &mut self.status_component;

        self.tui.draw(|f| {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status
            ])
            .split(f.area());

            let header = Paragraph::new(Line::from(vec![
                Span::styled(
                    "TC Gas Station",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(format!("[{}]", network), Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::styled(api_url, Style::default().fg(Color::DarkGray)),
            ]))
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(header, chunks[0]);

            let tabs = Tabs::new(Tab::ALL.iter().map(Tab::title).collect::<Vec<_>>())
                .select(active_tab.index())
                .block(Block::default().borders(Borders::ALL))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            f.render_widget(tabs, chunks[1]);

            match active_tab {
                Tab::Buy => buy.draw(f, chunks[2]),
                Tab::Status => status.draw(f, chunks[2]),
            }

            let footer = Paragraph::new(Line::from(vec![
                Span::raw(status_message),
                Span::styled(
                    "   [Tab] Switch tab  [q] Quit",
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            f.render_widget(footer, chunks[3]);
        })?;
        Ok(())
    }
}
