use lazy_static::lazy_static;

lazy_static! {
    pub static ref STYLE_HEADING: console::Style = console::Style::new().bold();
    pub static ref STYLE_METADATA: console::Style = console::Style::new().bright().blue();
}
