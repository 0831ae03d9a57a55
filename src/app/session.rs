//! Session gate: who is signed in, and what the header shows for it.
use crate::api::Transport;
use crate::api::types::User;
use crate::format::avatar_initial;
use crate::page::{HistoryView, ToastKind};
use crate::prefs::BANNER_DISMISSED_KEY;

use super::{App, Outcome};

const MIN_USERNAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 6;

impl<T: Transport> App<T> {
    /// Ask the backend who is signed in and switch the header accordingly.
    ///
    /// Any failure counts as "nobody": the guest view is shown and the
    /// error only reaches the activity log.
    pub fn check_auth(&mut self) {
        match self.api.session() {
            Ok(info) => match info.user.filter(|_| info.logged_in) {
                Some(user) => self.show_logged_in(user),
                None => self.show_guest(),
            },
            Err(err) => {
                self.api.log().note(&format!("session check failed: {err}"));
                self.show_guest();
            }
        }
    }

    pub fn login(&mut self, email: &str, password: &str) -> Outcome {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.page
                .toast(ToastKind::Error, "Email et mot de passe requis");
            return Outcome::Rejected;
        }

        match self.api.login(email, password) {
            Ok(result) => {
                let user = result.user.unwrap_or_else(|| User {
                    username: email.split('@').next().unwrap_or(email).to_string(),
                    email: Some(email.to_string()),
                });
                self.show_logged_in(user);
                let message = result.message.as_deref().unwrap_or("Connexion réussie");
                self.page.toast(ToastKind::Success, message);
                self.load_history();
                Outcome::Done
            }
            Err(err) => {
                self.report_failure(&err, "Erreur lors de la connexion");
                Outcome::Failed
            }
        }
    }

    pub fn register(&mut self, username: &str, email: &str, password: &str) -> Outcome {
        let username = username.trim();
        let email = email.trim();
        let problem = if username.chars().count() < MIN_USERNAME_CHARS {
            Some("Le nom d'utilisateur doit contenir au moins 3 caractères")
        } else if !email.contains('@') {
            Some("Email invalide")
        } else if password.chars().count() < MIN_PASSWORD_CHARS {
            Some("Le mot de passe doit contenir au moins 6 caractères")
        } else {
            None
        };
        if let Some(message) = problem {
            self.page.toast(ToastKind::Error, message);
            return Outcome::Rejected;
        }

        match self.api.register(username, email, password) {
            Ok(result) => {
                let user = result.user.unwrap_or_else(|| User {
                    username: username.to_string(),
                    email: Some(email.to_string()),
                });
                self.show_logged_in(user);
                let message = result.message.as_deref().unwrap_or("Compte créé avec succès");
                self.page.toast(ToastKind::Success, message);
                self.load_history();
                Outcome::Done
            }
            Err(err) => {
                self.report_failure(&err, "Erreur lors de l'inscription");
                Outcome::Failed
            }
        }
    }

    /// Sign out. Only a failure to reach the backend keeps the user signed
    /// in; a server-side error still drops the local session.
    pub fn logout(&mut self) -> Outcome {
        self.close_menus();
        match self.api.logout() {
            Err(err) if err.is_connection_error() => {
                self.page
                    .toast(ToastKind::Error, "Erreur lors de la déconnexion");
                Outcome::Failed
            }
            Ok(()) | Err(_) => {
                self.show_guest();
                self.page.toast(ToastKind::Success, "Déconnexion réussie");
                Outcome::Done
            }
        }
    }

    /// Close the guest banner for the rest of this session.
    pub fn dismiss_banner(&mut self) {
        self.session.set(BANNER_DISMISSED_KEY, "true");
        self.page.auth.guest_banner_visible = false;
    }

    fn show_logged_in(&mut self, user: User) {
        let auth = &mut self.page.auth;
        auth.login_button_visible = false;
        auth.user_menu_visible = true;
        auth.avatar = avatar_initial(&user.username);
        auth.user_name = user.username.clone();
        auth.guest_banner_visible = false;
        self.state.sign_in(user);
    }

    fn show_guest(&mut self) {
        self.state.sign_out();
        let auth = &mut self.page.auth;
        auth.login_button_visible = true;
        auth.user_menu_visible = false;
        auth.dropdown_open = false;
        auth.avatar.clear();
        auth.user_name.clear();
        auth.guest_banner_visible = self.session.get(BANNER_DISMISSED_KEY).is_none();
        self.page.history = HistoryView::SignedOut;
    }
}
