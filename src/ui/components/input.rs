use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Single-line text box. The cursor always sits after the last character.
pub struct InputWidget<'a> {
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    focused: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            placeholder: "",
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let mut spans = if self.value.is_empty() {
            vec![Span::styled(self.placeholder, Theme::dim())]
        } else {
            vec![Span::styled(self.value, Theme::normal())]
        };
        if self.focused {
            let at = if self.value.is_empty() { 0 } else { spans.len() };
            spans.insert(at, Span::styled(" ", Theme::selected()));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(widget: InputWidget<'_>) -> String {
        let area = Rect::new(0, 0, 24, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect()
    }

    #[test]
    fn shows_placeholder_when_empty() {
        let line = rendered(InputWidget::new("Search", "").placeholder("Town or village"));
        assert!(line.contains("Town or village"));
    }

    #[test]
    fn shows_value_instead_of_placeholder() {
        let line = rendered(
            InputWidget::new("Search", "Nashik")
                .placeholder("Town or village")
                .focused(true),
        );
        assert!(line.contains("Nashik"));
        assert!(!line.contains("Town"));
    }
}
