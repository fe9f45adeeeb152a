use crate::state::{GameState, Sender, Status};
use crate::tui::app::{AppState, BUTTONS};
use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{popup, tail_window};

pub(super) fn draw_auction(f: &mut Frame, app: &AppState) {
    let game = app.game();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(f.area());

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // lot
            Constraint::Min(4),    // participants
            Constraint::Length(6), // pending items
            Constraint::Length(6), // history
        ])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // chat
            Constraint::Length(3), // input
            Constraint::Length(4), // buttons + notice
        ])
        .split(columns[1]);

    f.render_widget(lot_panel(game), left[0]);
    f.render_widget(participants_panel(game), left[1]);
    f.render_widget(pending_panel(game), left[2]);
    f.render_widget(history_panel(game, left[3].height.saturating_sub(2) as usize), left[3]);

    let chat_height = right[0].height.saturating_sub(2) as usize;
    f.render_widget(chat_panel(game, chat_height, app.chat_offset()), right[0]);

    let input = Paragraph::new(format!("> {}", app.input))
        .block(Block::default().title("Say something").borders(Borders::ALL));
    f.render_widget(input, right[1]);
    let cursor_x = right[1].x + 3 + app.input.chars().count() as u16;
    if cursor_x < right[1].x + right[1].width.saturating_sub(1) {
        f.set_cursor_position(Position::new(cursor_x, right[1].y + 1));
    }

    f.render_widget(controls_panel(app), right[2]);
}

fn lot_panel(game: &GameState) -> Paragraph<'static> {
    let status_style = match game.status {
        Status::Bidding => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Status::GameOver => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Yellow),
    };
    let mut lines = vec![Line::from(vec![
        Span::raw("Status: "),
        Span::styled(game.status.label().to_string(), status_style),
    ])];
    match game.current_item() {
        Some(item) => {
            lines.push(Line::from(format!("Under the hammer: {item}")));
            let bidder = game.high_bidder().unwrap_or("-");
            lines.push(Line::from(format!("High bid: {}  by {bidder}", game.current_bid)));
        }
        None => lines.push(Line::from(Span::styled(
            "No item under the hammer",
            Style::default().add_modifier(Modifier::DIM),
        ))),
    }
    Paragraph::new(lines).block(Block::default().title("auctioneer").borders(Borders::ALL))
}

fn participants_panel(game: &GameState) -> List<'static> {
    let items: Vec<ListItem> = if game.participants.is_empty() {
        vec![ListItem::new("No players yet.")]
    } else {
        game.participants
            .iter()
            .map(|(name, budget)| {
                let won = game.items_of(name);
                let mut lines = vec![Line::from(vec![
                    Span::styled(name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!("  {budget} credits")),
                ])];
                if !won.is_empty() {
                    let list =
                        won.iter().map(|i| format!("{} ({})", i.name, i.price)).collect::<Vec<_>>();
                    lines.push(Line::from(format!("  won: {}", list.join(", "))));
                }
                ListItem::new(lines)
            })
            .collect()
    };
    List::new(items).block(Block::default().title("Participants").borders(Borders::ALL))
}

fn pending_panel(game: &GameState) -> Paragraph<'static> {
    let text = if game.item_list.is_empty() {
        "Nothing pending.".to_string()
    } else {
        let numbered: Vec<String> =
            game.item_list.iter().enumerate().map(|(i, n)| format!("{}. {n}", i + 1)).collect();
        numbered.join("  ")
    };
    Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!("Pending ({})", game.item_list.len()))
                .borders(Borders::ALL),
        )
}

fn history_panel(game: &GameState, height: usize) -> Paragraph<'static> {
    let lines: Vec<Line> = tail_window(&game.auction_history, height, 0)
        .iter()
        .map(|h| Line::from(h.clone()))
        .collect();
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("History (F6)").borders(Borders::ALL))
}

fn sender_style(sender: Sender) -> Style {
    match sender {
        Sender::You => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Sender::Auctioneer => Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        Sender::System => Style::default().add_modifier(Modifier::DIM),
    }
}

fn chat_panel(game: &GameState, height: usize, offset: usize) -> Paragraph<'static> {
    let lines: Vec<Line> = tail_window(&game.chat_log, height, offset)
        .iter()
        .map(|e| {
            Line::from(vec![
                Span::styled(format!("{}: ", e.sender.label()), sender_style(e.sender)),
                Span::raw(e.message.clone()),
            ])
        })
        .collect();
    let title = if offset > 0 { format!("Chat (-{offset})") } else { "Chat".to_string() };
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL))
}

fn controls_panel(app: &AppState) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (i, button) in BUTTONS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" • "));
        }
        let style = if button.enabled(app.game()) {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(button.label(), style));
    }
    let notice = match app.notice() {
        Some(n) => Line::from(Span::styled(n.to_string(), Style::default().fg(Color::Yellow))),
        None => Line::from(Span::styled(
            "F1 help • F6 history • Esc quit",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };
    Paragraph::new(vec![Line::from(spans), notice])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL))
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = popup(70, 70, f.area());
    let lines = vec![
        Line::from(Span::styled("Commands", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("start game players Ann, Bo budget 100"),
        Line::from("add Old Vase, Diamond Ring"),
        Line::from("shuffle"),
        Line::from("auction next | auction first | auction <item>"),
        Line::from("<player> bid <amount>"),
        Line::from("<player> pass"),
        Line::from("sell it | sell <player> <amount> | no sale"),
        Line::from(""),
        Line::from(Span::styled("Console", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("/upload <file.csv|file.txt>   /save   /reset"),
        Line::from("F2-F5 buttons • Up/Down scroll chat • Esc close/quit"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title("Help").borders(Borders::ALL)),
        area,
    );
}

pub(super) fn draw_history(f: &mut Frame, app: &AppState) {
    let area = popup(70, 80, f.area());
    let history = &app.game().auction_history;
    let lines: Vec<Line> = if history.is_empty() {
        vec![Line::from("No lots settled yet.")]
    } else {
        history.iter().enumerate().map(|(i, h)| Line::from(format!("{:>3}. {h}", i + 1))).collect()
    };
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Auction history").borders(Borders::ALL)),
        area,
    );
}
