// src/ui/mod.rs

use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Color, Element, Length};

use crate::calendar::time_label;
use crate::messages::Message;
use crate::models::{CalendarEvent, EventStatus};
use crate::utils::{first_line, truncate};

pub mod calendar;
pub mod login;
pub mod profile;
pub mod styles;

use styles::{CardStyle, EventChipStyle, SUBTEXT, TEXT};

/// Widget color for a derived event status.
pub fn status_color(status: EventStatus) -> Color {
    let (r, g, b) = status.rgb();
    Color::from_rgb(r, g, b)
}

/// Clickable chip for one event inside a day cell.
pub fn event_chip(event: &CalendarEvent, max_chars: usize) -> Element<'_, Message> {
    let label = if event.all_day {
        truncate(&event.title, max_chars)
    } else {
        truncate(
            &format!("{} {}", event.start.format("%-I:%M%P"), event.title),
            max_chars,
        )
    };

    button(text(label).size(11))
        .width(Length::Fill)
        .padding([2, 4])
        .style(iced::theme::Button::Custom(Box::new(EventChipStyle {
            background: status_color(event.status),
            text: Color::WHITE,
        })))
        .on_press(Message::EventClicked(event.id.clone()))
        .into()
}

/// Full-width event card used by the day view.
pub fn view_event(event: &CalendarEvent) -> Element<'_, Message> {
    let strip_color = status_color(event.status);

    let mut details = column![
        text(&event.title).size(16).style(iced::theme::Text::Color(TEXT)),
        row![
            text(time_label(event)).size(13).style(iced::theme::Text::Color(SUBTEXT)),
            status_badge(event.status),
        ]
        .spacing(8)
        .align_items(Alignment::Center),
    ]
    .spacing(4);

    if let Some(description) = &event.details.description {
        details = details.push(
            text(truncate(first_line(description), 80))
                .size(12)
                .style(iced::theme::Text::Color(SUBTEXT)),
        );
    }

    button(
        row![
            container(text(""))
                .width(4)
                .height(40)
                .style(iced::theme::Container::Custom(Box::new(StripStyle(strip_color)))),
            details,
        ]
        .spacing(12)
        .align_items(Alignment::Center),
    )
    .width(Length::Fill)
    .padding(12)
    .style(iced::theme::Button::Secondary)
    .on_press(Message::EventClicked(event.id.clone()))
    .into()
}

/// Details panel for the selected event.
pub fn event_details(event: &CalendarEvent) -> Element<'_, Message> {
    let muted = |label: String| text(label).size(13).style(iced::theme::Text::Color(SUBTEXT));

    let mut body = column![
        row![
            text(&event.title).size(20).style(iced::theme::Text::Color(TEXT)).width(Length::Fill),
            button(text("Close").size(12))
                .style(iced::theme::Button::Text)
                .on_press(Message::CloseEventDetails),
        ]
        .align_items(Alignment::Center),
        row![muted(time_label(event)), status_badge(event.status)].spacing(8),
    ]
    .spacing(8);

    if let Some(description) = &event.details.description {
        body = body.push(text(description).size(14).style(iced::theme::Text::Color(TEXT)));
    }
    if let Some(category) = &event.details.category {
        body = body.push(muted(format!("Category: {}", category)));
    }
    body = body
        .push(muted(format!("Streak: {} day(s)", event.details.streak)))
        .push(muted(format!("Progress: {:.0}%", event.details.progress)))
        .push(muted(
            if event.details.is_completed {
                "Completed today"
            } else {
                "Not completed today"
            }
            .to_string(),
        ));

    container(body)
        .padding(20)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(CardStyle)))
        .into()
}

pub fn status_badge<'a>(status: EventStatus) -> Element<'a, Message> {
    let color = status_color(status);
    container(text(status.label()).size(10).style(iced::theme::Text::Color(Color::WHITE)))
        .padding([2, 8])
        .style(iced::theme::Container::Custom(Box::new(StripStyle(color))))
        .into()
}

// Helper for section headers
pub fn section_header(label: &str) -> Element<'_, Message> {
    text(label)
        .size(20)
        .style(iced::theme::Text::Color(styles::ACCENT))
        .into()
}

struct StripStyle(Color);

impl container::StyleSheet for StripStyle {
    type Style = iced::Theme;
    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(iced::Background::Color(self.0)),
            border: iced::Border {
                radius: 2.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color_matches_palette() {
        assert_eq!(status_color(EventStatus::Overdue), styles::DESTRUCTIVE);
        assert_eq!(status_color(EventStatus::Upcoming), styles::ACCENT);
    }
}
