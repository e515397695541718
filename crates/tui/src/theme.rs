use ratatui::style::Color;

pub struct Theme {
    pub label: Color,
    pub field_bg: Color,
    pub field_fg: Color,
    pub placeholder_fg: Color,
    pub hint: Color,
}

pub const THEME: Theme = Theme {
    label: Color::Reset,
    field_bg: Color::LightBlue,
    field_fg: Color::Black,
    placeholder_fg: Color::Black,
    hint: Color::Gray,
};
