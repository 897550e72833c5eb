/*!
 * BLUEDECK Quick Access Panel
 * Adapter status, paired devices and per-device controls
 */

use bluedeck_core::{Backend, BluetoothStatus, Device};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;

// Conservative color palette
const BLUE: Color = Color::Rgb(100, 149, 237);
const GRAY: Color = Color::Rgb(128, 128, 128);
const WHITE: Color = Color::Rgb(255, 255, 255);
const GREEN: Color = Color::Rgb(34, 139, 34);
const RED: Color = Color::Rgb(220, 20, 60);
const CONNECTED: Color = Color::Rgb(220, 222, 223);
const DISCONNECTED: Color = Color::Rgb(103, 112, 123);

const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];

pub fn render_ui<B: Backend + 'static>(f: &mut Frame, app: &App<B>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Adapter status
            Constraint::Min(5),    // Devices
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_status_bar(f, rows[0], app);
    render_device_list(f, columns[0], app);
    render_device_panel(f, columns[1], app.selected_device());
    render_footer(f, rows[2], app);
}

fn render_status_bar<B: Backend + 'static>(f: &mut Frame, area: Rect, app: &App<B>) {
    let status = app.store.state().status;
    let status_color = match status {
        BluetoothStatus::On | BluetoothStatus::Discoverable => GREEN,
        BluetoothStatus::Off | BluetoothStatus::NoAdapter => RED,
        BluetoothStatus::Loading | BluetoothStatus::Unknown => GRAY,
    };

    let line = Line::from(vec![
        Span::styled("ᛒ ", Style::default().fg(BLUE)),
        Span::styled("Bluetooth status: ", Style::default().fg(CONNECTED)),
        Span::styled(
            status.label(),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Bluetooth")
            .border_style(Style::default().fg(BLUE)),
    );

    f.render_widget(paragraph, area);
}

fn render_device_list<B: Backend + 'static>(f: &mut Frame, area: Rect, app: &App<B>) {
    let state = app.store.state();

    let title = if state.loading {
        format!(
            "Paired devices {}",
            SPINNER[app.spinner_frame % SPINNER.len()]
        )
    } else {
        "Paired devices [r]".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(GRAY));

    if state.devices.is_empty() {
        let message = if state.loading {
            "Loading..."
        } else {
            "No paired devices"
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(GRAY))
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .devices
        .iter()
        .enumerate()
        .map(|(i, device)| device_item(device, i == app.selected))
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn device_item(device: &Device, selected: bool) -> ListItem<'_> {
    let prefix = if selected { "▶ " } else { "  " };
    let (indicator, color) = if device.connected {
        ("●", CONNECTED)
    } else {
        ("○", DISCONNECTED)
    };

    let content = Line::from(vec![
        Span::raw(prefix),
        Span::styled(indicator, Style::default().fg(if device.connected { GREEN } else { GRAY })),
        Span::raw(" "),
        Span::styled(device.display_name(), Style::default().fg(color)),
    ]);

    if selected {
        ListItem::new(content).style(Style::default().bg(BLUE).fg(WHITE))
    } else {
        ListItem::new(content)
    }
}

fn render_device_panel(f: &mut Frame, area: Rect, device: Option<&Device>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Device")
        .border_style(Style::default().fg(GRAY));

    let Some(device) = device else {
        let paragraph = Paragraph::new("Select a device")
            .style(Style::default().fg(GRAY))
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    };

    let yes_no = |value: bool| if value { "Yes" } else { "No" };
    let trusted = device.trusted.map_or("Unknown", yes_no);
    let action = if device.connected {
        "[Enter] Disconnect"
    } else {
        "[Enter] Connect"
    };

    let content = vec![
        Line::from(Span::styled(
            device.display_name(),
            Style::default().fg(WHITE).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field_line("Address: ", device.mac().to_string(), WHITE),
        field_line(
            "Connected: ",
            yes_no(device.connected).to_string(),
            if device.connected { GREEN } else { GRAY },
        ),
        field_line("Trusted: ", trusted.to_string(), WHITE),
        field_line("Paired: ", yes_no(device.paired).to_string(), WHITE),
        Line::from(""),
        Line::from(action),
        Line::from("[f] Forget"),
    ];

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, area);
}

fn field_line(label: &'static str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(GRAY)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn render_footer<B: Backend + 'static>(f: &mut Frame, area: Rect, app: &App<B>) {
    let state = app.store.state();

    let mut spans = vec![Span::styled(
        "[↑↓] Select  [r] Refresh  [q] Quit",
        Style::default().fg(GRAY),
    )];

    if let Some(updated) = state.last_updated {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("Updated {}", updated.format("%H:%M:%S")),
            Style::default().fg(DISCONNECTED),
        ));
    }

    if let Some(error) = &state.last_error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(error.as_str(), Style::default().fg(RED)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(GRAY)),
    );

    f.render_widget(paragraph, area);
}
