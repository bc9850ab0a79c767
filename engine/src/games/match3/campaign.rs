use super::cascade::Resolution;
use super::level::{Difficulty, GameStatus, LevelEvent, LevelSession};
use super::types::Position;
use crate::config::{GameConfig, Validate};
use crate::games::SessionRng;
use crate::log;

#[derive(Clone, Debug, PartialEq)]
pub enum CampaignEvent {
    LevelStarted {
        level: u32,
        seed: u64,
    },
    LevelCompleted {
        level: u32,
        level_score: u32,
        bonus: u32,
        total_score: u32,
    },
    LevelFailed {
        level: u32,
        level_score: u32,
    },
    /// The next level could not be set up; the campaign stops on the won level.
    LevelStartFailed {
        level: u32,
        reason: String,
    },
    Level(LevelEvent),
}

/// Consecutive levels at one difficulty. Winning a level banks its score plus
/// a bonus that grows with the level number and starts the next level on a
/// fresh board.
pub struct Campaign {
    config: GameConfig,
    difficulty: Difficulty,
    rng: SessionRng,
    session: LevelSession,
    current_level: u32,
    completed_levels: Vec<u32>,
    total_score: u32,
    pending_events: Vec<CampaignEvent>,
}

impl Campaign {
    pub fn new(difficulty: Difficulty, config: &GameConfig, seed: Option<u64>) -> Result<Self, String> {
        config.validate()?;
        let mut rng = SessionRng::from_optional_seed(seed);
        let level_seed = rng.next_seed();
        let session = LevelSession::new(difficulty, config, Some(level_seed))?;
        log!("Campaign started: difficulty={}, seed={}", difficulty, rng.seed());

        Ok(Self {
            config: config.clone(),
            difficulty,
            rng,
            session,
            current_level: 1,
            completed_levels: Vec::new(),
            total_score: 0,
            pending_events: vec![CampaignEvent::LevelStarted {
                level: 1,
                seed: level_seed,
            }],
        })
    }

    pub fn swap(&mut self, a: Position, b: Position) -> Result<Resolution, String> {
        let resolution = self.session.swap(a, b)?;
        self.after_action();
        Ok(resolution)
    }

    pub fn activate(&mut self, pos: Position) -> Result<Resolution, String> {
        let resolution = self.session.activate(pos)?;
        self.after_action();
        Ok(resolution)
    }

    /// Level 1 is always open; any other level opens once the one before it
    /// has been completed.
    pub fn is_level_unlocked(&self, level: u32) -> bool {
        level == 1 || (level > 1 && self.completed_levels.contains(&(level - 1)))
    }

    /// Restarts play at an unlocked level on a fresh board. The banked total
    /// is kept; the abandoned level's score is not.
    pub fn select_level(&mut self, level: u32) -> Result<(), String> {
        if !self.is_level_unlocked(level) {
            return Err(format!("Level {} is locked", level));
        }
        self.start_level(level)
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn completed_levels(&self) -> &[u32] {
        &self.completed_levels
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Over once the current level is no longer playable: it was lost, or the
    /// level after a win could not be started.
    pub fn is_over(&self) -> bool {
        self.session.status() != GameStatus::InProgress
    }

    pub fn take_events(&mut self) -> Vec<CampaignEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn after_action(&mut self) {
        self.pending_events
            .extend(self.session.take_events().into_iter().map(CampaignEvent::Level));

        match self.session.status() {
            GameStatus::InProgress => {}
            GameStatus::Won => self.complete_level(),
            GameStatus::Lost => {
                log!(
                    "Campaign level {} failed with score {}",
                    self.current_level,
                    self.session.score()
                );
                self.pending_events.push(CampaignEvent::LevelFailed {
                    level: self.current_level,
                    level_score: self.session.score(),
                });
            }
        }
    }

    fn complete_level(&mut self) {
        let level = self.current_level;
        let level_score = self.session.score();
        let bonus = self.config.scoring.level_completion_bonus(level);
        self.total_score = self
            .total_score
            .saturating_add(level_score)
            .saturating_add(bonus);
        if !self.completed_levels.contains(&level) {
            self.completed_levels.push(level);
        }
        self.pending_events.push(CampaignEvent::LevelCompleted {
            level,
            level_score,
            bonus,
            total_score: self.total_score,
        });
        log!(
            "Level {} complete: {} points + {} bonus, total {}",
            level,
            level_score,
            bonus,
            self.total_score
        );

        let next = level.saturating_add(1);
        if let Err(reason) = self.start_level(next) {
            log!("Could not start level {}: {}", next, reason);
            self.pending_events
                .push(CampaignEvent::LevelStartFailed { level: next, reason });
        }
    }

    fn start_level(&mut self, level: u32) -> Result<(), String> {
        let seed = self.rng.next_seed();
        self.session = LevelSession::new(self.difficulty, &self.config, Some(seed))?;
        self.current_level = level;
        self.pending_events
            .push(CampaignEvent::LevelStarted { level, seed });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DifficultyTable;
    use crate::games::match3::level::DifficultySettings;

    fn config_with(easy: DifficultySettings) -> GameConfig {
        GameConfig {
            difficulties: DifficultyTable {
                easy,
                ..DifficultyTable::default()
            },
            ..GameConfig::default()
        }
    }

    fn play_hint(campaign: &mut Campaign) -> Resolution {
        let (a, b) = campaign.session().hint().unwrap();
        campaign.swap(a, b).unwrap()
    }

    fn completions(events: &[CampaignEvent]) -> Vec<(u32, u32, u32, u32)> {
        events
            .iter()
            .filter_map(|event| match event {
                CampaignEvent::LevelCompleted {
                    level,
                    level_score,
                    bonus,
                    total_score,
                } => Some((*level, *level_score, *bonus, *total_score)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_campaign_starts_at_level_one() {
        let mut campaign = Campaign::new(Difficulty::Moderate, &GameConfig::default(), Some(3)).unwrap();
        assert_eq!(campaign.current_level(), 1);
        assert_eq!(campaign.total_score(), 0);
        assert!(campaign.completed_levels().is_empty());
        assert!(!campaign.is_over());
        assert_eq!(campaign.session().moves_left(), 30);
        assert!(matches!(
            campaign.take_events().as_slice(),
            [CampaignEvent::LevelStarted { level: 1, .. }]
        ));
    }

    #[test]
    fn test_winning_banks_score_with_level_bonus() {
        let config = config_with(DifficultySettings::new(10, 1));
        let mut campaign = Campaign::new(Difficulty::Easy, &config, Some(9)).unwrap();
        let first_board = campaign.session().board().render();
        campaign.take_events();

        let first = play_hint(&mut campaign);
        let after_first = campaign.total_score();
        assert_eq!(after_first, first.score_delta + 100);
        assert_eq!(campaign.current_level(), 2);
        assert_eq!(campaign.completed_levels(), &[1]);
        assert_eq!(campaign.session().score(), 0);
        assert_eq!(campaign.session().moves_made(), 0);
        assert_ne!(campaign.session().board().render(), first_board);

        let events = campaign.take_events();
        assert_eq!(completions(&events), vec![(1, first.score_delta, 100, after_first)]);
        assert!(events.contains(&CampaignEvent::Level(LevelEvent::StatusChanged {
            status: GameStatus::Won,
            score: first.score_delta,
        })));
        assert!(matches!(events.last(), Some(CampaignEvent::LevelStarted { level: 2, .. })));

        let second = play_hint(&mut campaign);
        assert_eq!(campaign.total_score(), after_first + second.score_delta + 200);
        assert_eq!(campaign.completed_levels(), &[1, 2]);
        assert_eq!(campaign.current_level(), 3);
    }

    #[test]
    fn test_losing_ends_the_campaign() {
        let config = config_with(DifficultySettings::new(1, 1_000_000));
        let mut campaign = Campaign::new(Difficulty::Easy, &config, Some(9)).unwrap();
        campaign.take_events();

        let resolution = play_hint(&mut campaign);

        assert!(campaign.is_over());
        assert_eq!(campaign.current_level(), 1);
        assert_eq!(campaign.total_score(), 0);
        assert!(campaign.take_events().contains(&CampaignEvent::LevelFailed {
            level: 1,
            level_score: resolution.score_delta,
        }));
        assert!(campaign.swap(Position::new(0, 0), Position::new(0, 1)).is_err());
    }

    #[test]
    fn test_select_level_respects_unlocks() {
        let config = config_with(DifficultySettings::new(1, 1_000_000));
        let mut campaign = Campaign::new(Difficulty::Easy, &config, Some(9)).unwrap();
        assert!(campaign.is_level_unlocked(1));
        assert!(!campaign.is_level_unlocked(0));
        assert!(!campaign.is_level_unlocked(2));
        assert!(campaign.select_level(2).is_err());

        play_hint(&mut campaign);
        assert!(campaign.is_over());

        campaign.select_level(1).unwrap();
        assert!(!campaign.is_over());
        assert_eq!(campaign.current_level(), 1);
        assert_eq!(campaign.session().moves_left(), 1);
        assert!(matches!(
            campaign.take_events().last(),
            Some(CampaignEvent::LevelStarted { level: 1, .. })
        ));
    }

    #[test]
    fn test_replaying_a_level_does_not_duplicate_completion() {
        let config = config_with(DifficultySettings::new(10, 1));
        let mut campaign = Campaign::new(Difficulty::Easy, &config, Some(12)).unwrap();
        play_hint(&mut campaign);
        assert!(campaign.is_level_unlocked(2));

        campaign.select_level(1).unwrap();
        let banked = campaign.total_score();
        let replay = play_hint(&mut campaign);

        assert_eq!(campaign.completed_levels(), &[1]);
        assert_eq!(campaign.total_score(), banked + replay.score_delta + 100);
        assert_eq!(campaign.current_level(), 2);
    }

    #[test]
    fn test_same_seed_same_campaign() {
        let config = GameConfig::default();
        let a = Campaign::new(Difficulty::Easy, &config, Some(77)).unwrap();
        let b = Campaign::new(Difficulty::Easy, &config, Some(77)).unwrap();
        assert_eq!(a.session().board().render(), b.session().board().render());
    }
}
