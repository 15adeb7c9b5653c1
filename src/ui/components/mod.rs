pub mod auth_form;
pub mod progress_bar;
pub mod recent_times;
pub mod scramble_panel;
pub mod stats_panel;
pub mod timer_display;
