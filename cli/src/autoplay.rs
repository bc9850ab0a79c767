use match3_engine::games::match3::{
    find_activatable, Campaign, LevelSession, Position, Resolution, ResolutionEvent,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Swap(Position, Position),
    Activate(Position),
}

/// Prefers a swap that resolves; falls back to triggering a special.
pub fn choose_action(session: &LevelSession) -> Option<Action> {
    if let Some((a, b)) = session.hint() {
        return Some(Action::Swap(a, b));
    }
    find_activatable(session.board()).map(Action::Activate)
}

pub fn apply(campaign: &mut Campaign, action: Action) -> Result<Resolution, String> {
    match action {
        Action::Swap(a, b) => campaign.swap(a, b),
        Action::Activate(pos) => campaign.activate(pos),
    }
}

pub struct AutoplaySummary {
    pub turns: u32,
    pub levels_completed: u32,
    pub total_score: u32,
    pub specials_created: u32,
    pub combos: u32,
    pub longest_cascade: u32,
}

/// Plays until `levels` levels are completed, the campaign is over, no action
/// is left or `max_turns` is reached. `on_turn` sees the campaign after every
/// accepted action.
pub fn run(
    campaign: &mut Campaign,
    levels: u32,
    max_turns: u32,
    mut on_turn: impl FnMut(&Campaign, &Resolution),
) -> Result<AutoplaySummary, String> {
    let mut summary = AutoplaySummary {
        turns: 0,
        levels_completed: 0,
        total_score: 0,
        specials_created: 0,
        combos: 0,
        longest_cascade: 0,
    };
    let target_level = campaign.current_level().saturating_add(levels);

    while !campaign.is_over()
        && campaign.current_level() < target_level
        && summary.turns < max_turns
    {
        let Some(action) = choose_action(campaign.session()) else {
            break;
        };
        let resolution = apply(campaign, action)?;
        if !resolution.accepted {
            return Err(format!("Autoplay action {:?} was rejected: {:?}", action, resolution.rejection()));
        }
        summary.turns += 1;

        for event in &resolution.events {
            match event {
                ResolutionEvent::SpecialCreated { .. } => summary.specials_created += 1,
                ResolutionEvent::Combo { .. } => summary.combos += 1,
                ResolutionEvent::BoardSettled { cascades } => {
                    summary.longest_cascade = summary.longest_cascade.max(*cascades);
                }
                _ => {}
            }
        }
        on_turn(campaign, &resolution);
    }

    summary.levels_completed = u32::try_from(campaign.completed_levels().len()).unwrap_or(u32::MAX);
    summary.total_score = campaign.total_score();
    Ok(summary)
}
