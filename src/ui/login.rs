// src/ui/login.rs

use iced::widget::{button, column, container, text, text_input};
use iced::{Alignment, Element, Length};

use crate::messages::Message;
use crate::ui::styles::{CardStyle, InputStyle, PrimaryButtonStyle, DESTRUCTIVE, SUBTEXT, TEXT};
use crate::ui_state::UiState;

/// Token entry form. Accounts are issued by the server; this only stores the
/// bearer token the user pastes in.
pub fn view(state: &UiState) -> Element<'_, Message> {
    let mut submit = button(text("Log In").size(14))
        .padding([10, 20])
        .style(iced::theme::Button::Custom(Box::new(PrimaryButtonStyle)));
    if !state.token_input.trim().is_empty() {
        submit = submit.on_press(Message::SubmitLogin);
    }

    let mut form = column![
        text("Log in").size(26).style(iced::theme::Text::Color(TEXT)),
        text("Paste the access token issued by your habit tracker account.")
            .size(13)
            .style(iced::theme::Text::Color(SUBTEXT)),
        text_input("Access token", &state.token_input)
            .on_input(Message::TokenChanged)
            .on_submit(Message::SubmitLogin)
            .secure(true)
            .padding(10)
            .style(iced::theme::TextInput::Custom(Box::new(InputStyle))),
    ]
    .spacing(14)
    .align_items(Alignment::Start);

    if let Some(error) = &state.login_error {
        form = form.push(text(error).size(13).style(iced::theme::Text::Color(DESTRUCTIVE)));
    }
    form = form.push(submit);

    container(
        container(form)
            .padding(30)
            .max_width(420.0)
            .style(iced::theme::Container::Custom(Box::new(CardStyle))),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x()
    .center_y()
    .into()
}
