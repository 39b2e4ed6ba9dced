//! Ready-made menus: a tooltip and a draggable popup with buttons.

mod popup;
mod tooltip;

pub use popup::{PopupAction, PopupButton, SimplePopup, SimplePopupData};
pub use tooltip::{SIMPLE_TOOLTIP, SimpleTooltip, SimpleTooltipData};
