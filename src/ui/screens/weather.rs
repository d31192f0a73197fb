use crate::logic::{ForecastView, SessionPhase, SessionState};
use crate::models::{DailyPoint, Extreme};
use crate::ui::components::{humidity_gauge, temperature_gauge, wind_gauge, InputWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct WeatherScreen<'a> {
    pub state: &'a SessionState,
    pub input: &'a str,
    pub status_message: Option<&'a str>,
}

impl<'a> WeatherScreen<'a> {
    pub fn new(state: &'a SessionState, input: &'a str) -> Self {
        Self {
            state,
            input,
            status_message: None,
        }
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for WeatherScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(3), // Search box
                Constraint::Min(10),   // Forecast body
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let mut title = vec![Span::styled("AgriWeather", Theme::title())];
        if self.state.loading() {
            title.push(Span::styled(" - loading...", Theme::warning()));
        }
        Paragraph::new(Line::from(title)).render(chunks[0], buf);

        InputWidget::new("Search location", self.input)
            .placeholder("Type a town or village and press Enter")
            .focused(!self.state.loading())
            .render(chunks[1], buf);

        match &self.state.phase {
            SessionPhase::Ready(view) => render_forecast(view, chunks[2], buf),
            phase => self.render_placeholder(phase, chunks[2], buf),
        }

        if let Some(msg) = self.status_message {
            Paragraph::new(Span::styled(msg, Theme::dim())).render(chunks[3], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Search ", Theme::nav_label()),
            Span::styled("[Ctrl-L]", Theme::nav_key()),
            Span::styled("My location ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl WeatherScreen<'_> {
    fn render_placeholder(&self, phase: &SessionPhase, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(area);
        block.render(area, buf);

        let line = match phase {
            SessionPhase::Idle => Line::from(Span::styled(
                "Search for a place or press Ctrl-L to use your location",
                Theme::dim(),
            )),
            SessionPhase::Resolving => Line::from(vec![
                Span::styled("Finding ", Theme::dim()),
                Span::styled(self.state.query.as_str(), Theme::highlight()),
                Span::styled("...", Theme::dim()),
            ]),
            SessionPhase::Fetching { geo } => Line::from(vec![
                Span::styled("Loading forecast for ", Theme::dim()),
                Span::styled(geo.display_name(), Theme::highlight()),
                Span::styled("...", Theme::dim()),
            ]),
            SessionPhase::Failed { message } => {
                Line::from(Span::styled(message.as_str(), Theme::error()))
            }
            SessionPhase::Ready(_) => Line::default(),
        };

        let top_padding = inner.height.saturating_sub(1) / 2;
        let centered = Rect {
            y: inner.y + top_padding,
            height: inner.height.saturating_sub(top_padding),
            ..inner
        };
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(centered, buf);
    }
}

fn render_forecast(view: &ForecastView, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Location and current conditions
            Constraint::Min(6),    // Daily cards
            Constraint::Length(8), // Window summary and alerts
        ])
        .split(area);

    render_current(view, chunks[0], buf);
    render_daily(&view.daily, chunks[1], buf);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_window_summary(view, bottom[0], buf);
    render_alerts(view, bottom[1], buf);
}

fn render_current(view: &ForecastView, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    let block = Block::default()
        .title("Location")
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(columns[0]);
    block.render(columns[0], buf);

    let mut lines = vec![
        Line::from(Span::styled(view.geo.display_name(), Theme::highlight())),
        Line::from(Span::styled(
            format!("{:.2}, {:.2}", view.geo.latitude(), view.geo.longitude()),
            Theme::dim(),
        )),
    ];
    if let (Some(rise), Some(set)) = (view.sunrise, view.sunset) {
        lines.push(Line::from(vec![
            Span::styled("Sunrise ", Theme::dim()),
            Span::styled(rise.format("%H:%M").to_string(), Theme::normal()),
            Span::styled("  Sunset ", Theme::dim()),
            Span::styled(set.format("%H:%M").to_string(), Theme::normal()),
        ]));
    }
    Paragraph::new(lines).render(inner, buf);

    let current = view.current.as_ref();
    let today = view.daily.first().map(|d| d.temp_range_label());
    temperature_gauge("Temperature", current.map(|c| c.temp_c))
        .detail(today)
        .render(columns[1], buf);
    let gusts = view
        .summaries
        .as_ref()
        .map(|s| format!("gusts {:.0} km/h", s.peak_gust.value));
    wind_gauge("Wind", current.map(|c| c.wind_speed_kmh))
        .detail(gusts)
        .render(columns[2], buf);
    let humidity = view.hourly_window.first().map(|h| h.humidity_percent);
    humidity_gauge("Humidity", humidity).render(columns[3], buf);
}

fn render_daily(daily: &[DailyPoint], area: Rect, buf: &mut Buffer) {
    if daily.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = daily
        .iter()
        .map(|_| Constraint::Ratio(1, daily.len() as u32))
        .collect();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (day, card) in daily.iter().zip(cards.iter()) {
        let label = day.day_label();
        let block = Block::default()
            .title(label.as_str())
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(*card);
        block.render(*card, buf);

        let condition = day.condition();
        let lines = vec![
            Line::from(format!("{} {}", condition.symbol(), condition)),
            Line::from(Span::styled(
                day.temp_range_label(),
                Style::default().fg(Theme::temp_color(day.temp_max_c)),
            )),
            Line::from(Span::styled(
                day.rain_label(),
                Style::default().fg(Theme::RAIN),
            )),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

fn render_window_summary(view: &ForecastView, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(format!("Next {} hours", view.hourly_window.len()))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    block.render(area, buf);

    let Some(s) = view.summaries.as_ref() else {
        Paragraph::new(Span::styled("No hourly data", Theme::dim())).render(inner, buf);
        return;
    };

    let lines = vec![
        extreme_line("Hottest", s.hottest, "°C", Theme::temp_color(s.hottest.value)),
        extreme_line("Coolest", s.coolest, "°C", Theme::temp_color(s.coolest.value)),
        extreme_line("Rain chance", s.peak_rain_chance, "%", Theme::RAIN),
        extreme_line("Wind", s.peak_wind, " km/h", Theme::wind_color(s.peak_wind.value)),
        extreme_line("Gusts", s.peak_gust, " km/h", Theme::wind_color(s.peak_gust.value)),
    ];
    Paragraph::new(lines).render(inner, buf);
}

fn extreme_line(
    label: &str,
    extreme: Extreme,
    unit: &str,
    color: ratatui::style::Color,
) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Theme::dim()),
        Span::styled(
            format!("{:.0}{}", extreme.value, unit),
            Style::default().fg(color),
        ),
        Span::styled(
            format!(" at {}", extreme.occurred_at.format("%a %H:%M")),
            Theme::dim(),
        ),
    ])
}

fn render_alerts(view: &ForecastView, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title("Alerts")
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    block.render(area, buf);

    if view.alerts.is_empty() {
        Paragraph::new(Span::styled("No weather alerts", Theme::success())).render(inner, buf);
        return;
    }

    let lines: Vec<Line> = view
        .alerts
        .iter()
        .map(|alert| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", alert.kind.symbol()),
                    Style::default().fg(alert.kind.color()),
                ),
                Span::styled(alert.message.as_str(), Theme::normal()),
            ])
        })
        .collect();
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}
