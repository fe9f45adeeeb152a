mod auction;
mod layout;

use crate::tui::app::AppState;
use ratatui::prelude::Frame;

pub fn draw(f: &mut Frame, app: &AppState) {
    auction::draw_auction(f, app);
    if app.help_open() {
        auction::draw_help(f);
    } else if app.history_open() {
        auction::draw_history(f, app);
    }
}
