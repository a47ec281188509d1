//! Interactive tracking session.
//!
//! Prompts are blocking, so each one runs on the blocking pool while the
//! tracker's debounced lookups keep running on the async workers.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use inquire::{
    Autocomplete, CustomUserError, InquireError, Select, Text, autocompletion::Replacement,
};

use cityweather_core::{CityId, CityTracker, Config, LocationCandidate};

use crate::render;

/// Feeds every keystroke to the tracker and offers the stored suggestions
/// that still match what has been typed. Results for a shorter prefix land
/// after the keystroke that requested them, so they are narrowed locally.
#[derive(Clone)]
struct CityAutocomplete {
    tracker: Arc<CityTracker>,
}

impl Autocomplete for CityAutocomplete {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        self.tracker.set_query(input);
        Ok(self.tracker.store().read(|s| matching_suggestions(input, &s.suggestions)))
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Add,
    Expand,
    Remove,
    Theme,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Add => "Add city",
            MenuItem::Expand => "Expand / collapse city",
            MenuItem::Remove => "Remove city",
            MenuItem::Theme => "Toggle theme",
            MenuItem::Quit => "Quit",
        })
    }
}

struct CityChoice {
    id: CityId,
    label: String,
}

impl fmt::Display for CityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

enum Pick {
    Candidate(LocationCandidate),
    ByName(String),
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pick::Candidate(c) => f.write_str(&c.display_name),
            Pick::ByName(name) => write!(f, "Search \"{name}\" by name"),
        }
    }
}

/// Run a blocking prompt. `Ok(None)` means the user pressed Esc.
async fn prompt<T, F>(f: F) -> Result<Option<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await.context("Prompt task failed")? {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn run(mut config: Config) -> Result<()> {
    let tracker = Arc::new(CityTracker::from_config(&config)?);

    loop {
        println!();
        print!("{}", render::state(&tracker.snapshot(), config.theme));

        let items = vec![
            MenuItem::Add,
            MenuItem::Expand,
            MenuItem::Remove,
            MenuItem::Theme,
            MenuItem::Quit,
        ];
        let choice = match prompt(move || Select::new("What next?", items).prompt()).await {
            Ok(Some(choice)) => choice,
            Ok(None) => continue,
            Err(err) if is_interrupt(&err) => break,
            Err(err) => return Err(err),
        };

        let outcome = match choice {
            MenuItem::Add => add_city(&tracker).await,
            MenuItem::Expand => {
                pick_city(&tracker, "Expand or collapse which city?").await.map(|picked| {
                    if let Some(id) = picked {
                        tracker.toggle_expand(id);
                    }
                })
            }
            MenuItem::Remove => pick_city(&tracker, "Remove which city?").await.map(|picked| {
                if let Some(id) = picked {
                    tracker.remove(id);
                }
            }),
            MenuItem::Theme => {
                config.theme = config.theme.toggled();
                if let Err(err) = config.save() {
                    tracing::warn!(error = %err, "could not persist theme");
                }
                Ok(())
            }
            MenuItem::Quit => break,
        };

        match outcome {
            Ok(()) => {}
            Err(err) if is_interrupt(&err) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

/// Display names that start with `input`, ignoring case and surrounding space.
fn matching_suggestions(input: &str, candidates: &[LocationCandidate]) -> Vec<String> {
    let typed = input.trim().to_lowercase();
    if typed.is_empty() {
        return Vec::new();
    }
    candidates
        .iter()
        .filter(|c| c.display_name.to_lowercase().starts_with(&typed))
        .map(|c| c.display_name.clone())
        .collect()
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<InquireError>(), Some(InquireError::OperationInterrupted))
}

async fn add_city(tracker: &Arc<CityTracker>) -> Result<()> {
    let autocomplete = CityAutocomplete { tracker: tracker.clone() };
    let typed = prompt(move || {
        Text::new("City:")
            .with_autocomplete(autocomplete)
            .with_help_message("Type at least 3 letters; Tab completes")
            .prompt()
    })
    .await?;

    let Some(typed) = typed.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) else {
        return Ok(());
    };

    let known = tracker
        .store()
        .read(|s| s.suggestions.iter().find(|c| c.display_name == typed).cloned());

    let pick = match known {
        Some(candidate) => Pick::Candidate(candidate),
        None => {
            let mut options: Vec<Pick> = tracker
                .lookup_suggestions(&typed)
                .await
                .into_iter()
                .map(Pick::Candidate)
                .collect();
            if options.is_empty() {
                Pick::ByName(typed)
            } else {
                options.push(Pick::ByName(typed));
                match prompt(move || Select::new("Which one?", options).prompt()).await? {
                    Some(pick) => pick,
                    None => return Ok(()),
                }
            }
        }
    };

    let added = match pick {
        Pick::Candidate(candidate) => tracker.add_candidate(&candidate).await.map(Some),
        Pick::ByName(name) => tracker.add_city_by_name(&name).await,
    };
    if let Err(err) = added {
        // Already recorded in the store; shown on the next render.
        tracing::debug!(error = %err, "add city failed");
    }
    Ok(())
}

async fn pick_city(tracker: &CityTracker, message: &'static str) -> Result<Option<CityId>> {
    let choices: Vec<CityChoice> = tracker.store().read(|s| {
        s.cities
            .cities()
            .iter()
            .map(|c| CityChoice { id: c.id(), label: c.current.display_name.clone() })
            .collect()
    });

    if choices.is_empty() {
        return Ok(None);
    }

    let picked = prompt(move || Select::new(message, choices).prompt()).await?;
    Ok(picked.map(|c| c.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<LocationCandidate> {
        vec![
            LocationCandidate::new("London".into(), "GB".into(), Some("England".into()), 51.5, 0.1),
            LocationCandidate::new("Londonderry".into(), "GB".into(), None, 55.0, -7.3),
            LocationCandidate::new("Lonato".into(), "IT".into(), None, 45.5, 10.5),
        ]
    }

    #[test]
    fn suggestions_are_narrowed_to_typed_prefix() {
        let got = matching_suggestions("londo", &candidates());
        assert_eq!(got, vec!["London, England, GB", "Londonderry, GB"]);
    }

    #[test]
    fn full_display_name_still_matches() {
        let got = matching_suggestions(" London, England ", &candidates());
        assert_eq!(got, vec!["London, England, GB"]);
    }

    #[test]
    fn blank_or_unrelated_input_offers_nothing() {
        assert!(matching_suggestions("  ", &candidates()).is_empty());
        assert!(matching_suggestions("Paris", &candidates()).is_empty());
    }
}
