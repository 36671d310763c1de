use log::debug;

use crate::{
    actions::Action,
    effect::{Effect, Notification},
    filter::filter,
    navigation::{NavCommand, Transition},
    record::{Record, display_value},
    state::SearchState,
};

/// Root reducer
/// Pure function: takes state and action, returns (new state, effects to perform)
pub fn reduce(mut state: SearchState, action: &Action) -> (SearchState, Vec<Effect>) {
    let mut effects = Vec::new();

    match action {
        Action::Mount {
            anchor,
            overlay,
            viewport,
        } => {
            state.positioner.set_anchor(*anchor);
            state.positioner.set_overlay(*overlay);
            state.positioner.set_viewport(*viewport);
            if !state.config.loading {
                recompute_results(&mut state);
            }
            reposition(&mut state, &mut effects);
        }

        Action::Input(text) => {
            if state.config.disabled {
                return (state, effects);
            }
            disarm_pointer(&mut state, &mut effects);
            // Text box reflects the keystroke immediately, filtering waits
            state.query = text.clone();
            state.clearable = !state.query.is_empty();
            state.debounce_generation += 1;
            effects.push(Effect::ScheduleDebounce {
                generation: state.debounce_generation,
                delay: state.config.debounce(),
            });
        }

        Action::DebounceElapsed(generation) => {
            if *generation != state.debounce_generation {
                debug!(
                    "Ignoring superseded debounce #{} (current #{})",
                    generation, state.debounce_generation
                );
                return (state, effects);
            }
            effects.push(Effect::Notify(Notification::InputChanged(
                state.query.clone(),
            )));
            recompute_results(&mut state);
            if state.query.is_empty() {
                state.navigation.close();
            } else {
                state.navigation.open();
            }
            reposition(&mut state, &mut effects);
            state.navigation.reset();
        }

        Action::Focus => {
            if state.config.disabled {
                return (state, effects);
            }
            state.focused = true;
            supersede_blur_close(&mut state, &mut effects);
            recompute_results(&mut state);
            if !state.results.is_empty() {
                state.navigation.open();
                reposition(&mut state, &mut effects);
            }
        }

        Action::Blur => {
            state.focused = false;
            schedule_blur_close(&mut state, &mut effects);
        }

        Action::BlurGraceElapsed(generation) => {
            if *generation != state.blur_generation || state.focused {
                debug!("Ignoring superseded blur close #{}", generation);
                return (state, effects);
            }
            if state.pointer_armed {
                debug!("Blur close deferred: pointer activation pending");
                return (state, effects);
            }
            state.navigation.close();
        }

        Action::KeyPress(key) => {
            if state.config.disabled || !state.visible() {
                return (state, effects);
            }
            let Some(command) = NavCommand::from_key(*key) else {
                return (state, effects);
            };
            match state.navigation.apply(command, state.results.len()) {
                Transition::Commit(index) => {
                    if let Some(record) = state.results.get(index).cloned() {
                        commit(&mut state, record, &mut effects);
                    }
                }
                Transition::Dismissed => {
                    debug!("Dropdown dismissed");
                    disarm_pointer(&mut state, &mut effects);
                }
                Transition::Moved | Transition::NothingToCommit | Transition::Ignored => {}
            }
        }

        Action::ResultPointerDown => {
            if !state.config.disabled && state.visible() {
                state.pointer_armed = true;
            }
        }

        Action::ResultPointerCancel => {
            disarm_pointer(&mut state, &mut effects);
        }

        Action::ResultActivate(record) => {
            if state.config.disabled {
                return (state, effects);
            }
            commit(&mut state, record.clone(), &mut effects);
        }

        Action::Clear => {
            if state.config.disabled {
                return (state, effects);
            }
            state.query.clear();
            state.clearable = false;
            state.results.clear();
            state.navigation.close();
            state.navigation.reset();
            disarm_pointer(&mut state, &mut effects);
            supersede_debounce(&mut state, &mut effects);
        }

        Action::Resize { viewport, anchor } => {
            state.positioner.set_viewport(*viewport);
            state.positioner.set_anchor(*anchor);
            reposition(&mut state, &mut effects);
        }

        Action::Scroll { anchor } => {
            state.positioner.set_anchor(*anchor);
            reposition(&mut state, &mut effects);
        }

        Action::OverlayResized(size) => {
            if state.positioner.geometry().overlay != *size {
                state.positioner.set_overlay(*size);
                reposition(&mut state, &mut effects);
            }
        }

        Action::ReplaceCollection(records) => {
            state.collection = records.clone().into();
            refresh_after_replacement(&mut state, &mut effects);
        }

        Action::ReplaceFieldPaths(paths) => {
            state.config.filterable_keys = paths.clone();
            refresh_after_replacement(&mut state, &mut effects);
        }

        Action::SetMaxResults(raw) => {
            state.config.max_results = *raw;
            refresh_after_replacement(&mut state, &mut effects);
        }

        Action::SetLoading(loading) => {
            let finished = state.config.loading && !*loading;
            state.config.loading = *loading;
            if finished {
                refresh_after_replacement(&mut state, &mut effects);
            }
        }

        Action::SetDisabled(disabled) => {
            state.config.disabled = *disabled;
        }

        Action::PlacementResolved { generation, result } => {
            let visible = state.visible();
            state.positioner.resolve(*generation, visible, result);
        }

        Action::None => {}
    }

    (state, effects)
}

/// Recompute the result set from the primary inputs; always drops the highlight
fn recompute_results(state: &mut SearchState) {
    state.results = filter(
        &state.collection,
        &state.config.filterable_keys,
        &state.query,
        state.config.result_cap(),
    );
    state.navigation.reset();
    debug!(
        "Filtered {} records for {:?}: {} results",
        state.collection.len(),
        state.query,
        state.results.len()
    );
}

/// Collection, field path or cap changes apply immediately unless loading
fn refresh_after_replacement(state: &mut SearchState, effects: &mut Vec<Effect>) {
    if state.config.loading {
        debug!("Loading: result recomputation suppressed");
        return;
    }
    recompute_results(state);
    reposition(state, effects);
}

fn reposition(state: &mut SearchState, effects: &mut Vec<Effect>) {
    let visible = state.visible();
    if let Some(request) = state.positioner.reposition(visible) {
        effects.push(Effect::Reposition(request));
    }
}

fn supersede_debounce(state: &mut SearchState, effects: &mut Vec<Effect>) {
    state.debounce_generation += 1;
    effects.push(Effect::CancelDebounce);
}

fn schedule_blur_close(state: &mut SearchState, effects: &mut Vec<Effect>) {
    state.blur_generation += 1;
    effects.push(Effect::ScheduleBlurClose {
        generation: state.blur_generation,
        delay: state.config.blur_grace(),
    });
}

/// Drop a pending pointer activation; an unfocused open dropdown gets its close back
fn disarm_pointer(state: &mut SearchState, effects: &mut Vec<Effect>) {
    if !state.pointer_armed {
        return;
    }
    state.pointer_armed = false;
    if !state.focused && state.visible() {
        debug!("Pointer activation abandoned, rescheduling blur close");
        schedule_blur_close(state, effects);
    }
}

fn supersede_blur_close(state: &mut SearchState, effects: &mut Vec<Effect>) {
    state.blur_generation += 1;
    state.pointer_armed = false;
    effects.push(Effect::CancelBlurClose);
}

/// Commit a record: it becomes the query, the dropdown closes, listeners are told
fn commit(state: &mut SearchState, record: Record, effects: &mut Vec<Effect>) {
    state.query = display_value(&record, &state.config.display_key);
    state.clearable = !state.query.is_empty();
    state.navigation.close();
    state.navigation.reset();
    supersede_debounce(state, effects);
    supersede_blur_close(state, effects);
    effects.push(Effect::Notify(Notification::ResultSelected(record)));
}
