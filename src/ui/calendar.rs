// src/ui/calendar.rs

use chrono::NaiveDate;
use iced::widget::{button, column, container, row, scrollable, text, Column, Row};
use iced::{Alignment, Element, Length};

use crate::calendar::{events_on, CalendarGrid, CalendarView, GridView, ViewState, LOGIN_PROMPT};
use crate::messages::Message;
use crate::models::CalendarEvent;
use crate::navigation::Route;
use crate::ui::styles::{
    ActiveNavStyle, DayCellStyle, NavStyle, PrimaryButtonStyle, ACCENT, DESTRUCTIVE, SUBTEXT, TEXT,
};
use crate::ui::{event_chip, event_details, view_event};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_CELL_CHIPS: usize = 3;

/// Everything the calendar screen renders from.
pub struct CalendarScreen<'a> {
    pub view: &'a CalendarView,
    pub grid: &'a CalendarGrid,
    pub today: NaiveDate,
    pub selected: Option<&'a CalendarEvent>,
}

impl<'a> CalendarScreen<'a> {
    pub fn view(&self) -> Element<'a, Message> {
        match self.view.state() {
            ViewState::AuthLoading | ViewState::Loading => centered(
                column![text("Loading...").size(18).style(iced::theme::Text::Color(SUBTEXT))]
                    .align_items(Alignment::Center),
            ),
            ViewState::Unauthenticated => centered(
                column![
                    text(LOGIN_PROMPT).size(20).style(iced::theme::Text::Color(TEXT)),
                    button("Go to Login")
                        .style(iced::theme::Button::Custom(Box::new(PrimaryButtonStyle)))
                        .padding(12)
                        .on_press(Message::Navigate(Route::Login)),
                ]
                .spacing(16)
                .align_items(Alignment::Center),
            ),
            ViewState::Error(message) => centered(
                column![
                    text(message.clone()).size(18).style(iced::theme::Text::Color(DESTRUCTIVE)),
                    button("Try Again")
                        .style(iced::theme::Button::Custom(Box::new(PrimaryButtonStyle)))
                        .padding(12)
                        .on_press(Message::RefreshCalendar),
                ]
                .spacing(16)
                .align_items(Alignment::Center),
            ),
            ViewState::Ready(events) => self.ready(events),
        }
    }

    fn ready(&self, events: &'a [CalendarEvent]) -> Element<'a, Message> {
        let body: Element<'a, Message> = match self.grid.view() {
            GridView::Day => self.day_list(events),
            _ => self.day_grid(events),
        };

        let mut layout = column![self.toolbar(), body].spacing(16);
        if let Some(event) = self.selected {
            layout = layout.push(event_details(event));
        }
        layout.into()
    }

    fn toolbar(&self) -> Element<'a, Message> {
        let grid = self.grid;

        let mut back = button(text("‹").size(18))
            .padding([4, 12])
            .style(iced::theme::Button::Custom(Box::new(NavStyle)));
        if grid.can_go_previous() {
            back = back.on_press(Message::GridPrevious);
        }

        let views = GridView::ALL.iter().fold(Row::new().spacing(4), |row, view| {
            let style = if *view == grid.view() {
                iced::theme::Button::Custom(Box::new(ActiveNavStyle))
            } else {
                iced::theme::Button::Custom(Box::new(NavStyle))
            };
            row.push(
                button(text(view.label()).size(13))
                    .padding([6, 12])
                    .style(style)
                    .on_press(Message::GridViewSelected(*view)),
            )
        });

        row![
            back,
            button(text("›").size(18))
                .padding([4, 12])
                .style(iced::theme::Button::Custom(Box::new(NavStyle)))
                .on_press(Message::GridNext),
            button(text("Today").size(13))
                .padding([6, 12])
                .style(iced::theme::Button::Custom(Box::new(NavStyle)))
                .on_press(Message::GridToday),
            text(grid.title())
                .size(22)
                .style(iced::theme::Text::Color(TEXT))
                .width(Length::Fill)
                .horizontal_alignment(iced::alignment::Horizontal::Center),
            views,
            button(text("Refresh").size(13))
                .padding([6, 12])
                .style(iced::theme::Button::Custom(Box::new(PrimaryButtonStyle)))
                .on_press(Message::RefreshCalendar),
        ]
        .spacing(8)
        .align_items(Alignment::Center)
        .into()
    }

    /// Month and week grids: a header row of weekday names, then one row per week.
    fn day_grid(&self, events: &'a [CalendarEvent]) -> Element<'a, Message> {
        let header = WEEKDAYS.iter().fold(Row::new().spacing(4), |row, name| {
            row.push(
                text(*name)
                    .size(12)
                    .style(iced::theme::Text::Color(SUBTEXT))
                    .width(Length::Fill)
                    .horizontal_alignment(iced::alignment::Horizontal::Center),
            )
        });

        let max_chips = match self.grid.view() {
            GridView::Month => MONTH_CELL_CHIPS,
            _ => usize::MAX,
        };

        let weeks = self.grid.rows().into_iter().fold(Column::new().spacing(4), |grid, week| {
            let cells = week.into_iter().fold(Row::new().spacing(4), |row, day| {
                row.push(self.day_cell(day, events, max_chips))
            });
            grid.push(cells.height(Length::Fill))
        });

        column![header, weeks.height(Length::Fill)].spacing(6).height(Length::Fill).into()
    }

    fn day_cell(
        &self,
        day: NaiveDate,
        events: &'a [CalendarEvent],
        max_chips: usize,
    ) -> Element<'a, Message> {
        let on_day = events_on(events, day);
        let hidden = on_day.len().saturating_sub(max_chips);

        let mut content = column![text(day.format("%-d").to_string()).size(12)].spacing(3);
        for event in on_day.into_iter().take(max_chips) {
            content = content.push(event_chip(event, 18));
        }
        if hidden > 0 {
            content = content.push(
                text(format!("+{} more", hidden)).size(10).style(iced::theme::Text::Color(ACCENT)),
            );
        }

        let mut cell = button(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(4)
            .style(iced::theme::Button::Custom(Box::new(DayCellStyle {
                in_focus: self.grid.is_in_focus(day),
                is_today: day == self.today,
            })));
        if self.grid.is_valid_day(day) {
            cell = cell.on_press(Message::DaySelected(day));
        }
        cell.into()
    }

    fn day_list(&self, events: &'a [CalendarEvent]) -> Element<'a, Message> {
        let on_day = events_on(events, self.grid.anchor());

        if on_day.is_empty() {
            return centered(
                column![text("No habits scheduled for this day")
                    .size(18)
                    .style(iced::theme::Text::Color(SUBTEXT))]
                .align_items(Alignment::Center),
            );
        }

        let cards = on_day
            .into_iter()
            .fold(Column::new().spacing(12), |list, event| list.push(view_event(event)));

        scrollable(cards.padding([0, 4])).height(Length::Fill).into()
    }
}

fn centered<'a>(content: Column<'a, Message>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .into()
}
