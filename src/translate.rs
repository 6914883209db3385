//! Event Translator
//!
//! Pure mapping from one backend event to its micro-choreography: a list of
//! scheduled animations relative to a caller-supplied start time. Total over
//! the event vocabulary; kinds without choreography translate to an empty
//! list so the backend can grow its vocabulary without breaking old clients.
//!
//! # Patch Re-Timing
//!
//! Patches carried by an event are never applied at arrival time. They are
//! re-timed either by a uniform offset (so the authoritative value change
//! lands just behind the motion) or by the per-prefix
//! [`PatchTimings`](crate::config::PatchTimings) table, which raises on an
//! unmatched path rather than guessing.

use serde_json::{json, Value};
use tracing::debug;

use crate::animation::{Animation, EasingCurve, ScheduledAnimation, TweenProperty};
use crate::config::MotionConfig;
use crate::error::TranslateError;
use crate::events::{BackendEvent, EventKind, StatePatch};
use crate::geometry::{PixelPoint, TableGeometry};
use crate::paths::{PlayerId, StatePath};
use crate::sounds::SoundKind;

/// How far past the destination the chip push overshoots before settling
const CHIP_PUSH_OVERSHOOT: f32 = 1.15;

/// Translator for a fixed geometry and timing configuration
pub struct Translator<'a> {
    geometry: &'a dyn TableGeometry,
    config: &'a MotionConfig,
}

impl<'a> Translator<'a> {
    /// Create a translator
    pub fn new(geometry: &'a dyn TableGeometry, config: &'a MotionConfig) -> Self {
        Self { geometry, config }
    }

    /// Translate one event into its scheduled animations, all relative to
    /// `start`
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError`] when the event violates the backend
    /// contract (missing subject, unmatched timed-patch path, malformed
    /// player path). Unhandled kinds are not errors; they yield an empty
    /// list.
    pub fn translate(
        &self,
        start: u64,
        event: &BackendEvent,
    ) -> Result<Vec<ScheduledAnimation>, TranslateError> {
        let mut out = Vec::new();
        match event.kind {
            EventKind::Post => self.post(&mut out, start, event)?,
            EventKind::DealPlayer => self.deal_player(&mut out, start, event)?,
            EventKind::DealBoard => self.deal_board(&mut out, start, event)?,
            EventKind::Bet | EventKind::RaiseTo | EventKind::Call => {
                self.chip_action(&mut out, start, event)?;
            }
            EventKind::Check => self.check(&mut out, start, event)?,
            EventKind::Fold => self.fold(&mut out, start, event)?,
            EventKind::Win => self.win(&mut out, start, event)?,
            EventKind::ReturnChips | EventKind::ReturnBet => {
                self.return_chips(&mut out, start, event)?;
            }
            EventKind::RevealHand => self.reveal_hand(&mut out, start, event)?,
            EventKind::Muck => self.muck(&mut out, start, event)?,
            EventKind::BountyWin => self.bounty_win(&mut out, start, event),
            EventKind::NewStreet => self.new_street(&mut out, start, event)?,
            EventKind::SnapTo | EventKind::Reset => {
                out.push(ScheduledAnimation::become_at(
                    StatePath::Root,
                    start,
                    event.value.clone(),
                ));
            }
            EventKind::SetBlindPos => {
                out.push(ScheduledAnimation::become_at(
                    StatePath::TableDealerPos,
                    start,
                    event.value.clone(),
                ));
                self.uniform_patches(&mut out, start, &event.patches);
            }
            // Acknowledged no-ops: the vocabulary knows them, motion doesn't.
            EventKind::TakeSeat
            | EventKind::LeaveSeat
            | EventKind::SitOut
            | EventKind::SitIn
            | EventKind::TimeBank
            | EventKind::ChatLine
            | EventKind::Unhandled => {}
        }
        Ok(out)
    }

    // =========================================================================
    // Per-kind choreography
    // =========================================================================

    fn post(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        self.sound_pair(out, start, SoundKind::ChipsSoft);
        // Single-phase push; posting blinds is quieter than a bet.
        if let (Some(from), Some(to)) = (
            self.geometry.point_for(&StatePath::PlayerStack(subj.clone())),
            self.geometry
                .point_for(&StatePath::PlayerUncollectedBets(subj.clone())),
        ) {
            out.push(ScheduledAnimation::new(
                StatePath::PlayerUncollectedBets(subj.clone()),
                start,
                position_tween(from, to, self.config.action_duration_ms / 2, EasingCurve::EaseOut),
            ));
        }
        self.uniform_patches(out, start, &event.patches);
        Ok(())
    }

    fn chip_action(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        let label = match event.kind {
            EventKind::Bet => "bet",
            EventKind::RaiseTo => "raise",
            _ => "call",
        };
        let sound = if event.kind == EventKind::Call {
            SoundKind::ChipsSoft
        } else {
            SoundKind::Chips
        };

        out.push(ScheduledAnimation::become_at(
            StatePath::PlayerLastAction(subj.clone()),
            start,
            json!(label),
        ));
        out.push(ScheduledAnimation::become_at(
            StatePath::PlayerProgressBar(subj.clone()),
            start,
            json!(false),
        ));
        self.sound_pair(out, start, sound);

        // Two-phase push: chips fly past the bet spot, then settle back.
        if let (Some(from), Some(dest)) = (
            self.geometry.point_for(&StatePath::PlayerStack(subj.clone())),
            self.geometry
                .point_for(&StatePath::PlayerUncollectedBets(subj.clone())),
        ) {
            let overshoot = from.lerp(&dest, CHIP_PUSH_OVERSHOOT);
            let push_ms = self.config.action_duration_ms / 2;
            let settle_ms = self.config.action_duration_ms - push_ms;
            out.push(ScheduledAnimation::new(
                StatePath::PlayerUncollectedBets(subj.clone()),
                start,
                position_tween(from, overshoot, push_ms, EasingCurve::EaseOut),
            ));
            out.push(ScheduledAnimation::new(
                StatePath::PlayerUncollectedBets(subj.clone()),
                start + push_ms,
                position_tween(overshoot, dest, settle_ms, EasingCurve::EaseOutBack),
            ));
        }

        self.uniform_patches(out, start, &event.patches);
        Ok(())
    }

    fn check(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        out.push(ScheduledAnimation::become_at(
            StatePath::PlayerLastAction(subj.clone()),
            start,
            json!("check"),
        ));
        self.sound_pair(out, start, SoundKind::Check);

        // A check has no chips to move; pulse the seat highlight instead,
        // splitting the action duration into a dim and a recover phase.
        let dim_ms = self.config.action_duration_ms / 2;
        let recover_ms = self.config.action_duration_ms - dim_ms;
        out.push(ScheduledAnimation::new(
            StatePath::PlayerHighlight(subj.clone()),
            start,
            opacity_tween(1.0, 0.4, dim_ms, EasingCurve::EaseOut),
        ));
        out.push(ScheduledAnimation::new(
            StatePath::PlayerHighlight(subj.clone()),
            start + dim_ms,
            opacity_tween(0.4, 1.0, recover_ms, EasingCurve::EaseIn),
        ));
        out.push(ScheduledAnimation::become_at(
            StatePath::PlayerProgressBar(subj.clone()),
            start,
            json!(false),
        ));
        self.uniform_patches(out, start, &event.patches);
        Ok(())
    }

    fn fold(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        out.push(ScheduledAnimation::become_at(
            StatePath::PlayerLastAction(subj.clone()),
            start,
            json!("fold"),
        ));
        out.push(ScheduledAnimation::become_at(
            StatePath::PlayerProgressBar(subj.clone()),
            start,
            json!(false),
        ));
        self.sound_pair(out, start, SoundKind::Fold);

        // A player folding shown cards reveals them first; the discard only
        // starts once the reveal finishes.
        let cards = StatePath::PlayerCards(subj.clone());
        let discard_offset = match event.value.get("shown_cards") {
            Some(shown) if !shown.is_null() => {
                out.push(ScheduledAnimation::become_at(
                    cards.clone(),
                    start,
                    shown.clone(),
                ));
                out.push(ScheduledAnimation::new(
                    cards.clone(),
                    start,
                    Animation::Css {
                        name: "flip".to_string(),
                        duration_ms: self.config.cards_duration_ms,
                    },
                ));
                self.config.cards_duration_ms
            }
            _ => 0,
        };

        let discard_start = start + discard_offset;
        if let Some(from) = self.geometry.point_for(&cards) {
            out.push(ScheduledAnimation::new(
                cards.clone(),
                discard_start,
                position_tween(
                    from,
                    self.geometry.muck_point(),
                    self.config.cards_duration_ms,
                    EasingCurve::EaseIn,
                ),
            ));
        }
        out.push(ScheduledAnimation::new(
            cards.clone(),
            discard_start,
            opacity_tween(1.0, 0.0, self.config.cards_duration_ms, EasingCurve::EaseIn),
        ));
        out.push(ScheduledAnimation::become_at(
            cards,
            discard_start + self.config.cards_duration_ms,
            json!([]),
        ));

        self.uniform_patches(out, start, &event.patches);
        Ok(())
    }

    fn win(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        let move_ms = self.config.win_move_ms();
        let fade_ms = self.config.win_fade_ms();

        self.sound_pair(out, start, SoundKind::Win);

        // Winner highlight comes on with the fanfare and restores with it.
        out.push(ScheduledAnimation::become_at(
            StatePath::PlayerHighlight(subj.clone()),
            start,
            json!(true),
        ));
        out.push(ScheduledAnimation::become_at(
            StatePath::PlayerHighlight(subj.clone()),
            start + SoundKind::Win.duration_ms(),
            json!(false),
        ));

        // Pot slides to the winner for 75% of the duration, fades for 25%.
        if let (Some(from), Some(to)) = (
            self.geometry.point_for(&StatePath::TablePot),
            self.geometry.point_for(&StatePath::PlayerStack(subj.clone())),
        ) {
            out.push(ScheduledAnimation::new(
                StatePath::TablePot,
                start,
                position_tween(from, to, move_ms, EasingCurve::EaseOutCubic),
            ));
        }
        out.push(ScheduledAnimation::new(
            StatePath::TablePot,
            start + move_ms,
            opacity_tween(1.0, 0.0, fade_ms, EasingCurve::EaseOut),
        ));

        // Badge/notification becomes ready exactly at the move boundary.
        out.push(ScheduledAnimation::become_at(
            StatePath::TableNotification,
            start + move_ms,
            json!({ "winner": subj.as_str(), "amount": event.value.get("amount").cloned() }),
        ));

        // Authoritative stack/pot values land after the chips arrive.
        self.timed_patches(out, start + move_ms, &event.patches)?;
        Ok(())
    }

    fn return_chips(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        self.sound_pair(out, start, SoundKind::ChipsSoft);
        if let (Some(from), Some(to)) = (
            self.geometry
                .point_for(&StatePath::PlayerUncollectedBets(subj.clone())),
            self.geometry.point_for(&StatePath::PlayerStack(subj.clone())),
        ) {
            out.push(ScheduledAnimation::new(
                StatePath::PlayerUncollectedBets(subj.clone()),
                start,
                position_tween(from, to, self.config.action_duration_ms, EasingCurve::EaseOut),
            ));
        }
        self.timed_patches(out, start, &event.patches)?;
        Ok(())
    }

    fn reveal_hand(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        let cards = StatePath::PlayerCards(subj.clone());
        out.push(ScheduledAnimation::new(
            cards.clone(),
            start,
            Animation::Css {
                name: "flip".to_string(),
                duration_ms: self.config.deal_duration_ms,
            },
        ));
        out.push(ScheduledAnimation::become_at(cards, start, event.value.clone()));
        self.sound_pair(out, start, SoundKind::Deal);
        self.uniform_patches(out, start, &event.patches);
        Ok(())
    }

    fn muck(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        let cards = StatePath::PlayerCards(subj.clone());
        self.sound_pair(out, start, SoundKind::Fold);
        out.push(ScheduledAnimation::new(
            cards.clone(),
            start,
            opacity_tween(1.0, 0.0, self.config.cards_duration_ms, EasingCurve::EaseIn),
        ));
        out.push(ScheduledAnimation::become_at(
            cards,
            start + self.config.cards_duration_ms,
            json!([]),
        ));
        self.uniform_patches(out, start, &event.patches);
        Ok(())
    }

    fn bounty_win(&self, out: &mut Vec<ScheduledAnimation>, start: u64, event: &BackendEvent) {
        self.sound_pair(out, start, SoundKind::Bounty);
        out.push(ScheduledAnimation::become_at(
            StatePath::TableNotification,
            start,
            event.value.clone(),
        ));
        self.uniform_patches(out, start, &event.patches);
    }

    fn deal_player(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        let subj = subject(event)?;
        let cards = StatePath::PlayerCards(subj.clone());
        self.sound_pair(out, start, SoundKind::Deal);
        out.push(ScheduledAnimation::new(
            cards.clone(),
            start,
            Animation::Css {
                name: "deal".to_string(),
                duration_ms: self.config.deal_duration_ms,
            },
        ));
        // Cards land when the deal transition finishes.
        let dealt = if event.value.is_null() {
            json!(["back", "back"])
        } else {
            event.value.clone()
        };
        out.push(ScheduledAnimation::become_at(
            cards,
            start + self.config.deal_duration_ms,
            dealt,
        ));
        self.uniform_patches(out, start, &event.patches);
        Ok(())
    }

    fn deal_board(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        self.sound_pair(out, start, SoundKind::Deal);
        out.push(ScheduledAnimation::new(
            StatePath::TableBoard,
            start,
            Animation::Css {
                name: "flip".to_string(),
                duration_ms: self.config.deal_duration_ms,
            },
        ));
        if !event.value.is_null() {
            out.push(ScheduledAnimation::become_at(
                StatePath::TableBoard,
                start + self.config.deal_duration_ms,
                event.value.clone(),
            ));
        }
        self.timed_patches(out, start, &event.patches)?;
        Ok(())
    }

    fn new_street(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        start: u64,
        event: &BackendEvent,
    ) -> Result<(), TranslateError> {
        self.sound_pair(out, start, SoundKind::Deal);

        // Every cleared bet sweeps into the pot. The player id comes from
        // the patch path itself; a players/ path with no id means the
        // backend broke its own addressing contract.
        for patch in &event.patches {
            let path = parse_patch_path(&patch.path)?;
            if let StatePath::PlayerUncollectedBets(id) = &path {
                if let (Some(from), Some(to)) = (
                    self.geometry
                        .point_for(&StatePath::PlayerUncollectedBets(id.clone())),
                    self.geometry.point_for(&StatePath::TablePot),
                ) {
                    out.push(ScheduledAnimation::new(
                        path.clone(),
                        start,
                        position_tween(
                            from,
                            to,
                            self.config.action_duration_ms,
                            EasingCurve::EaseInOut,
                        ),
                    ));
                }
            }
            let offset = self
                .config
                .patch_timings
                .offset_for(&path)
                .ok_or_else(|| TranslateError::NoStartTime {
                    path: patch.path.clone(),
                })?;
            out.push(ScheduledAnimation::become_at(
                path,
                start + offset,
                patch.value.clone(),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Emit the sound Become and its clearing pair
    ///
    /// Sounds are state the renderer reads reactively; the off-signal at
    /// `start + duration` is mandatory, never fire-and-forget.
    fn sound_pair(&self, out: &mut Vec<ScheduledAnimation>, start: u64, sound: SoundKind) {
        out.push(ScheduledAnimation::become_at(
            StatePath::TableSound,
            start,
            json!(sound.name()),
        ));
        out.push(ScheduledAnimation::become_at(
            StatePath::TableSound,
            start + sound.duration_ms(),
            Value::Null,
        ));
    }

    /// Schedule patches at the uniform offset
    ///
    /// Paths outside the animated vocabulary are carried verbatim as
    /// [`StatePath::Other`]: the renderer updates that state without motion,
    /// but the authoritative value must still land before the terminal
    /// snapshot.
    fn uniform_patches(&self, out: &mut Vec<ScheduledAnimation>, start: u64, patches: &[StatePatch]) {
        for patch in patches {
            let path = StatePath::parse(&patch.path).unwrap_or_else(|| {
                debug!(path = %patch.path, "patch outside animated vocabulary; carrying verbatim");
                StatePath::Other(patch.path.clone())
            });
            out.push(ScheduledAnimation::become_at(
                path,
                start + self.config.patch_offset_ms,
                patch.value.clone(),
            ));
        }
    }

    /// Schedule patches against the per-prefix timing table
    ///
    /// # Errors
    ///
    /// Raises [`TranslateError::NoStartTime`] for a path with no configured
    /// offset and [`TranslateError::MalformedPlayerPath`] for a players/
    /// path with no id.
    fn timed_patches(
        &self,
        out: &mut Vec<ScheduledAnimation>,
        base: u64,
        patches: &[StatePatch],
    ) -> Result<(), TranslateError> {
        for patch in patches {
            let path = parse_patch_path(&patch.path)?;
            let offset = self
                .config
                .patch_timings
                .offset_for(&path)
                .ok_or_else(|| TranslateError::NoStartTime {
                    path: patch.path.clone(),
                })?;
            out.push(ScheduledAnimation::become_at(
                path,
                base + offset,
                patch.value.clone(),
            ));
        }
        Ok(())
    }
}

/// Parse a patch path, distinguishing a malformed player address from a
/// merely unconfigured one
fn parse_patch_path(raw: &str) -> Result<StatePath, TranslateError> {
    match StatePath::parse(raw) {
        Some(path) => Ok(path),
        None if raw.starts_with("players/") => Err(TranslateError::MalformedPlayerPath {
            path: raw.to_string(),
        }),
        None => Err(TranslateError::NoStartTime {
            path: raw.to_string(),
        }),
    }
}

/// The acting player, or the contract violation for kinds that need one
fn subject(event: &BackendEvent) -> Result<&PlayerId, TranslateError> {
    event.subj.as_ref().ok_or(TranslateError::MissingSubject {
        kind: event.kind.name(),
    })
}

fn position_tween(from: PixelPoint, to: PixelPoint, duration_ms: u64, easing: EasingCurve) -> Animation {
    Animation::Tween {
        property: TweenProperty::Position,
        from: json!({ "x": from.x, "y": from.y }),
        to: json!({ "x": to.x, "y": to.y }),
        duration_ms,
        easing,
    }
}

fn opacity_tween(from: f32, to: f32, duration_ms: u64, easing: EasingCurve) -> Animation {
    Animation::Tween {
        property: TweenProperty::Opacity,
        from: json!(from),
        to: json!(to),
        duration_ms,
        easing,
    }
}
