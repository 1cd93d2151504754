pub mod app;
pub mod filter_select;
pub mod info_panel;
pub mod limits_panel;
pub mod loading_overlay;
pub mod map_view;
pub mod office_modal;
pub mod point_marker;
pub mod search_bar;
pub mod tooltip;
pub mod zoom_controls;
