// src/ui/profile.rs

use iced::widget::{button, column, container, horizontal_rule, row, scrollable, text, text_input, Column};
use iced::{Element, Length};

use crate::messages::Message;
use crate::models::Profile;
use crate::ui::section_header;
use crate::ui::styles::{
    CardStyle, DestructiveButtonStyle, InputStyle, PrimaryButtonStyle, SUBTEXT, TEXT,
};
use crate::ui_state::UiState;

pub fn view<'a>(profile: Option<&'a Profile>, state: &'a UiState) -> Element<'a, Message> {
    let details: Element<'a, Message> = match profile {
        None if state.profile_loading => text("Loading...")
            .size(14)
            .style(iced::theme::Text::Color(SUBTEXT))
            .into(),
        None => text("Profile not loaded")
            .size(14)
            .style(iced::theme::Text::Color(SUBTEXT))
            .into(),
        Some(profile) => profile
            .display_fields()
            .into_iter()
            .fold(Column::new().spacing(6), |list, (key, value)| {
                list.push(
                    row![
                        text(key).size(13).style(iced::theme::Text::Color(SUBTEXT)).width(140),
                        text(value).size(14).style(iced::theme::Text::Color(TEXT)),
                    ]
                    .spacing(10),
                )
            })
            .into(),
    };

    let busy = state.profile_loading;
    let input = |placeholder: &str, value: &str, on_input: fn(String) -> Message, secure: bool| {
        text_input(placeholder, value)
            .on_input(on_input)
            .secure(secure)
            .padding(8)
            .style(iced::theme::TextInput::Custom(Box::new(InputStyle)))
    };

    let mut save = button(text("Save").size(13))
        .padding([8, 16])
        .style(iced::theme::Button::Custom(Box::new(PrimaryButtonStyle)));
    if !busy && !state.name_input.trim().is_empty() {
        save = save.on_press(Message::SaveProfile);
    }

    let mut change = button(text("Change Password").size(13))
        .padding([8, 16])
        .style(iced::theme::Button::Custom(Box::new(PrimaryButtonStyle)));
    if !busy {
        change = change.on_press(Message::SubmitPasswordChange);
    }

    let mut content = column![
        section_header("Profile"),
        card(details),
        section_header("Display name"),
        card(
            row![input("Name", &state.name_input, Message::NameChanged, false), save]
                .spacing(10)
                .into()
        ),
        section_header("Password"),
        card(
            column![
                input("Current password", &state.current_password, Message::CurrentPasswordChanged, true),
                input("New password", &state.new_password, Message::NewPasswordChanged, true),
                input("Confirm new password", &state.confirm_password, Message::ConfirmPasswordChanged, true),
                change,
            ]
            .spacing(10)
            .into()
        ),
    ]
    .spacing(16);

    if let Some(status) = &state.profile_status {
        content = content.push(text(status).size(13).style(iced::theme::Text::Color(SUBTEXT)));
    }

    content = content.push(horizontal_rule(1)).push(
        button(text("Log Out").size(13))
            .padding([8, 16])
            .style(iced::theme::Button::Custom(Box::new(DestructiveButtonStyle)))
            .on_press(Message::Logout),
    );

    scrollable(content.max_width(560.0)).height(Length::Fill).into()
}

fn card(content: Element<'_, Message>) -> Element<'_, Message> {
    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(CardStyle)))
        .into()
}
