use std::str::FromStr;

use fieldops_application::{GateView, Notification, Notifier, RouteOutcome};
use fieldops_core::{AppError, AppResult, RoleReference, UserSession};
use fieldops_domain::{ConsoleComponent, PermissionAction, PermissionState};

use crate::ConsoleRuntime;

const USAGE: &str = "usage: fieldops-console <login TOKEN ROLE_ID [ROLE_NAME] [DISPLAY_NAME] | logout | refresh | nav | check COMPONENT [ACTION] | open PATH>";

/// One invocation of the console client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Login {
        token: String,
        role_id: String,
        role_name: String,
        display_name: String,
    },
    Logout,
    Refresh,
    Nav,
    Check {
        component: ConsoleComponent,
        action: PermissionAction,
    },
    Open {
        path: String,
    },
}

impl ConsoleCommand {
    pub fn parse(args: &[String]) -> AppResult<Self> {
        let mut args = args.iter().map(String::as_str);
        let command = match args.next() {
            Some("login") => {
                let token = args.next();
                let role_id = args.next();
                let (Some(token), Some(role_id)) = (token, role_id) else {
                    return Err(usage_error());
                };
                let role_name = args.next().unwrap_or(role_id);
                let display_name = args.next().unwrap_or_default();

                Self::Login {
                    token: token.to_owned(),
                    role_id: role_id.to_owned(),
                    role_name: role_name.to_owned(),
                    display_name: display_name.to_owned(),
                }
            }
            Some("logout") => Self::Logout,
            Some("refresh") => Self::Refresh,
            Some("nav") => Self::Nav,
            Some("check") => {
                let component = args
                    .next()
                    .ok_or_else(usage_error)
                    .and_then(ConsoleComponent::from_str)?;
                let action = args
                    .next()
                    .map(PermissionAction::from_str)
                    .transpose()?
                    .unwrap_or_default();

                Self::Check { component, action }
            }
            Some("open") => Self::Open {
                path: args.next().ok_or_else(usage_error)?.to_owned(),
            },
            _ => return Err(usage_error()),
        };

        if args.next().is_some() {
            return Err(usage_error());
        }

        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Refresh => "refresh",
            Self::Nav => "nav",
            Self::Check { .. } => "check",
            Self::Open { .. } => "open",
        }
    }
}

pub async fn run(runtime: &ConsoleRuntime, command: ConsoleCommand) -> AppResult<()> {
    match command {
        ConsoleCommand::Login {
            token,
            role_id,
            role_name,
            display_name,
        } => {
            let session = UserSession::new(
                token,
                display_name,
                Some(RoleReference {
                    id: role_id,
                    name: role_name,
                }),
            );
            let state = runtime.sessions.login(session).await?;
            print_navigation(runtime, &state);
        }
        ConsoleCommand::Logout => {
            runtime.sessions.logout().await?;
            runtime.notifier.dismiss_all();
            runtime.notifier.show(Notification::info("Signed out"));
            println!("signed out");
        }
        ConsoleCommand::Refresh => {
            let state = runtime.store.refresh().await;
            print_navigation(runtime, &state);
        }
        ConsoleCommand::Nav => {
            let state = runtime.store.initialize().await;
            print_navigation(runtime, &state);
        }
        ConsoleCommand::Check { component, action } => {
            let state = runtime.store.initialize().await;
            let verdict = if state.has_permission(component, action) {
                "allowed"
            } else {
                "denied"
            };
            println!("{component} {action}: {verdict}");
        }
        ConsoleCommand::Open { path } => {
            let state = runtime.store.initialize().await;
            let guard = runtime.navigation.guard_for(path.as_str()).ok_or_else(|| {
                AppError::NotFound(format!("no console page is routed at '{path}'"))
            })?;

            match guard.resolve(&state, path, |path| path) {
                RouteOutcome::Loading => println!("loading permissions"),
                RouteOutcome::Render(path) => println!("opened {path}"),
                RouteOutcome::Redirect(redirect) => println!("redirected to {}", redirect.to),
            }
        }
    }

    Ok(())
}

fn print_navigation(runtime: &ConsoleRuntime, state: &PermissionState) {
    let sidebar = runtime.gate.render(state, || runtime.navigation.visible_items(state));

    match sidebar {
        GateView::Fallback(placeholder) => println!("{}", placeholder.label()),
        GateView::Content(items) if items.is_empty() => println!("no pages available"),
        GateView::Content(items) => {
            for item in items {
                println!("{:<24} {}", item.label().as_str(), item.path().as_str());
            }
        }
    }

    if let Some(error) = state.error() {
        println!("permissions unavailable: {error}");
    }
}

fn usage_error() -> AppError {
    AppError::Validation(USAGE.to_owned())
}
