//! User-facing texts and colours of the host-shift flow.

use crate::sink::{Embed, MessageView};

pub const COLOR_INFO: u32 = 0x0099_ff;
pub const COLOR_SUCCESS: u32 = 0x33_ff5b;
pub const COLOR_ANNOUNCEMENT: u32 = 0x77_85cc;

pub const NOTHING_AVAILABLE: &str = "No shifts with due dates found.";
pub const GENERIC_ERROR: &str = "An error occurred while processing your request.";
pub const INVALID_SELECTION: &str = "Invalid shift selection.";
pub const REFUSED: &str = "Shift refused.";
pub const EXPIRED: &str = "This shift request expired, no action was taken.";
pub const ANNOUNCEMENT_FAILED: &str = "Failed to send shift announcement.";
pub const ALREADY_OPEN: &str = "You already have a shift selection open.";

const ACCEPTED: &str = "The shift has been announced successfully!\nPlease see the shift's channel for more information!";

pub fn accepted_view() -> MessageView {
    MessageView::embed(
        Embed::default()
            .color(COLOR_SUCCESS)
            .description(ACCEPTED),
    )
}
