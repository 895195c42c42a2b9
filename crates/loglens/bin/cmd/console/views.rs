pub(crate) mod bottom_bar;
pub(crate) mod containers;
pub(crate) mod dashboard;
pub(crate) mod detail;
pub(crate) mod images;
pub(crate) mod logs;
pub(crate) mod placeholder;
pub(crate) mod popup;
pub(crate) mod volumes;
