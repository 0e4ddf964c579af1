use maud::{html, Markup};

use crate::templates::desktop_layout;

/// New-password form reached from the emailed link. The token rides along
/// as a hidden field.
pub fn reset_password_page(token: &str) -> Markup {
    desktop_layout(
        "Reset password",
        false,
        html! {
            main class="container narrow" {
                h1 { "Choose a new password" }

                form method="post" action="/reset-password" class="auth-form" {
                    input type="hidden" name="token" value=(token);

                    label for="password" { "New password" }
                    input type="password" id="password" name="password" autocomplete="new-password" minlength="6" required;

                    button type="submit" class="button primary" { "Set Password" }
                }
            }
        },
    )
}
