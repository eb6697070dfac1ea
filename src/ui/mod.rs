pub mod page;
pub mod template;
pub mod widget;
