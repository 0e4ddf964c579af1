use maud::{html, Markup};

use crate::templates::desktop_layout;

pub fn sign_in_page(google_enabled: bool) -> Markup {
    desktop_layout(
        "Sign in",
        false,
        html! {
            main class="container narrow" {
                h1 { "Welcome Back!" }

                form method="post" action="/sign-in" class="auth-form" {
                    label for="email" { "Email" }
                    input type="email" id="email" name="email" autocomplete="email" required;

                    label for="password" { "Password" }
                    input type="password" id="password" name="password" autocomplete="current-password" required;

                    a class="forgot-password-link" href="/forgot-password" { "Forgot Password" }

                    button type="submit" class="button primary" { "Sign In" }
                }

                @if google_enabled {
                    div class="social-login" {
                        p { "or" }
                        a class="button google" href="/oauth/google" { "Sign in with Google" }
                    }
                }

                p {
                    a href="/sign-up" { "Sign Up Instead" }
                }
            }
        },
    )
}
