//! The HTML pages: the landing page with the add-transaction form, and the
//! account pages.
//!
//! Signing in happens in the browser against the identity provider, so the
//! account pages only render their forms.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, link,
    },
    report::ReportFormat,
    transaction::TransactionType,
};

fn text_input(name: &str, label: &str, type_: &str, required: bool) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type=(type_)
                name=(name)
                id=(name)
                required[required]
                step=[(type_ == "number").then_some("0.01")]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn export_href(format: ReportFormat) -> String {
    let format = match format {
        ReportFormat::Excel => "excel",
        ReportFormat::Pdf => "pdf",
    };

    format!("{}?format={format}", endpoints::EXPORT_REPORT)
}

fn add_transaction_form() -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::ADD_FORM)
            class="space-y-4"
        {
            (text_input("uid", "使用者 ID", "text", true))
            (text_input("category", "類別", "text", true))
            (text_input("amount", "金額", "number", true))
            (text_input("note", "項目", "text", false))

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "類型" }

                select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(TransactionType::Expense.as_str()) selected
                    {
                        (TransactionType::Expense.label())
                    }
                    option value=(TransactionType::Income.as_str())
                    {
                        (TransactionType::Income.label())
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "新增" }
        }
    }
}

/// Display the landing page.
pub async fn get_index_page() -> Response {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="my-6 text-2xl font-bold" { "記帳" }

            div class=(CARD_STYLE)
            {
                (add_transaction_form())
            }

            p class="my-6 space-x-4"
            {
                "匯出報表："
                (link(&export_href(ReportFormat::Excel), "Excel"))
                (link(&export_href(ReportFormat::Pdf), "PDF"))
            }
        }
    };

    base("記帳", &content).into_response()
}

/// The account page variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccountPage {
    LogIn,
    Register,
    ResetPassword,
}

impl AccountPage {
    fn title(self) -> &'static str {
        match self {
            AccountPage::LogIn => "登入",
            AccountPage::Register => "註冊",
            AccountPage::ResetPassword => "重設密碼",
        }
    }

    fn render(self) -> Markup {
        let content = html! {
            div class=(FORM_CONTAINER_STYLE)
            {
                div class=(CARD_STYLE)
                {
                    h1 class="text-xl font-bold" { (self.title()) }

                    form id="account-form" class="space-y-4"
                    {
                        (text_input("email", "Email", "email", true))

                        @if self != AccountPage::ResetPassword {
                            (text_input("password", "密碼", "password", true))
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { (self.title()) }
                    }

                    p class="text-sm space-x-4"
                    {
                        @match self {
                            AccountPage::LogIn => {
                                (link(endpoints::REGISTER_VIEW, "註冊帳號"))
                                (link(endpoints::RESET_PASSWORD_VIEW, "忘記密碼"))
                            }
                            AccountPage::Register | AccountPage::ResetPassword => {
                                (link(endpoints::LOG_IN_VIEW, "返回登入"))
                            }
                        }
                    }
                }
            }
        };

        base(self.title(), &content)
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    AccountPage::LogIn.render().into_response()
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    AccountPage::Register.render().into_response()
}

/// Display the password reset page.
pub async fn get_reset_password_page() -> Response {
    AccountPage::ResetPassword.render().into_response()
}
