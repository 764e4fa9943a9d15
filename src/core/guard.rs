//! Route guard and role-gated navigation
//!
//! Evaluated on every request before routing reaches a handler.

use crate::entities::Role;
use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const SCHEDULE_PATH: &str = "/schedule";
pub const MODERATION_PATH: &str = "/moderation";

const PUBLIC_PATHS: [&str; 2] = ["/", LOGIN_PATH];
const PUBLIC_PREFIXES: [&str; 2] = ["/auth", "/files"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// True when `path` is `prefix` itself or lies below it.
fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|prefix| is_under(path, prefix))
}

/// Decides whether a request for `path` with the given session role may proceed.
/// `None` means the request carries no valid session.
pub fn check(path: &str, role: Option<Role>) -> GuardDecision {
    if is_public(path) {
        return GuardDecision::Allow;
    }

    match role {
        None => GuardDecision::Redirect(LOGIN_PATH),
        Some(Role::Moderator) if is_under(path, SCHEDULE_PATH) => {
            GuardDecision::Redirect(MODERATION_PATH)
        }
        Some(Role::Regular | Role::Professional) if is_under(path, MODERATION_PATH) => {
            GuardDecision::Redirect(DASHBOARD_PATH)
        }
        Some(_) => GuardDecision::Allow,
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> MenuItem {
    MenuItem { label, path }
}

/// Menu entries shown to a role. Every entry passes [`check`] for that role.
pub fn menu_for(role: Role) -> Vec<MenuItem> {
    let mut menu = vec![
        item("Inicio", DASHBOARD_PATH),
        item("Comunidad", "/community"),
        item("Consultas", "/consultas"),
        item("Anuncios", "/announcements"),
        item("Mensajes", "/messages"),
        item("Rutinas", "/routines"),
        item("Recetas", "/recipes"),
        item("Notificaciones", "/notifications"),
        item("Perfil", "/profile"),
    ];
    match role {
        Role::Regular | Role::Professional => menu.insert(5, item("Agenda", SCHEDULE_PATH)),
        Role::Moderator => menu.push(item("Moderación", MODERATION_PATH)),
    }
    menu
}
