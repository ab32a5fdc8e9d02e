//! Battle state machine
//!
//! Turn flow: round start -> turn start (statuses, cooldowns, stun, movement
//! range) -> move and/or act -> settle ticks -> next living unit.
//!
//! Every public operation validates before it mutates, so a rejected call
//! leaves the battle untouched. The end of battle is latched at the first HP
//! change that decides it; the rest of that action still resolves, and the
//! host hears about it when the operation returns.

use ahash::AHashSet;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::battle::ai::{AiCommander, AiPersonality, AiStrategy, BattleView};
use crate::battle::catalog::Catalog;
use crate::battle::constants::MELEE_REACH;
use crate::battle::effects::{damage_amount, heal_amount};
use crate::battle::events::{BattleEvent, BattleEventLog, BattleEventType};
use crate::battle::formulas::{CombatStat, Formulas, StandardFormulas};
use crate::battle::host::{BattleHost, BattleResult};
use crate::battle::input::BattleInput;
use crate::battle::projectile::Projectile;
use crate::battle::skills::{EffectKind, Skill, TargetMode};
use crate::battle::stage::parse_manifest_entry;
use crate::battle::status::tick_statuses;
use crate::battle::targeting::{affected_cells, affected_units, has_valid_target, target_in_range};
use crate::battle::turn_order::compute_turn_order;
use crate::battle::units::Unit;
use crate::core::config::BattleConfig;
use crate::core::error::{Result, TacticsError};
use crate::core::types::{TeamId, Tick, UnitId};
use crate::grid::hex::HexCoord;
use crate::grid::hex_grid::HexGrid;
use crate::grid::reachable::Reachable;

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    AwaitingInput,
    SkillTargeting { skill: usize },
    ProcessingTurn,
    BattleOver { outcome: BattleOutcome, surrender: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// What the current unit has done this turn
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    pub moved: bool,
    pub acted: bool,
    pub armed_skill: Option<usize>,
    /// Cached at turn start; shrinks to the unit's cell once it has moved
    pub reachable: Reachable,
}

/// A roster member and where the host wants it placed
#[derive(Debug, Clone)]
pub struct PartyMember {
    pub unit: Unit,
    pub q: i32,
    pub r: i32,
}

impl PartyMember {
    pub fn new(unit: Unit, q: i32, r: i32) -> Self {
        Self { unit, q, r }
    }
}

/// Which encounter to run and who fights it. `party[0]` is the leader.
#[derive(Debug, Clone)]
pub struct BattleSetup {
    pub chapter: u32,
    pub stage: u32,
    pub party: Vec<PartyMember>,
}

/// Collaborators and pacing for one encounter
pub struct BattleOptions {
    pub config: BattleConfig,
    pub formulas: Box<dyn Formulas>,
    pub strategy: Box<dyn AiStrategy>,
    /// Let the AI drive the player side too
    pub auto_battle: bool,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            config: BattleConfig::default(),
            formulas: Box::new(StandardFormulas),
            strategy: Box::new(AiCommander::new(AiPersonality::default())),
            auto_battle: false,
        }
    }
}

impl BattleOptions {
    /// Zero settle ticks and a seeded commander
    pub fn headless(seed: u64) -> Self {
        Self {
            config: BattleConfig::headless(),
            strategy: Box::new(AiCommander::with_seed(AiPersonality::default(), seed)),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_formulas(mut self, formulas: impl Formulas + 'static) -> Self {
        self.formulas = Box::new(formulas);
        self
    }

    pub fn with_strategy(mut self, strategy: impl AiStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn with_auto_battle(mut self, auto_battle: bool) -> Self {
        self.auto_battle = auto_battle;
        self
    }
}

/// Work queued for upcoming ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    AiDecision,
    Settle { ticks_left: u32, then: AfterSettle },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterSettle {
    NextUnit,
    ResumeInput,
}

pub struct BattleSystem<H: BattleHost> {
    grid: HexGrid,
    host: H,
    config: BattleConfig,
    formulas: Box<dyn Formulas>,
    strategy: Box<dyn AiStrategy>,

    units: Vec<Unit>,
    turn_order: Vec<UnitId>,
    /// Index into `turn_order` of the next unit to act
    next_index: usize,
    current: Option<UnitId>,

    phase: BattlePhase,
    action: ActionState,
    pending: Pending,
    latched: Option<BattleOutcome>,
    notified: bool,

    round: u32,
    tick: Tick,
    chapter: u32,
    stage: u32,
    reward_gold: u32,
    deployment: Vec<HexCoord>,

    camera_offset: Vec2,
    auto_battle: bool,
    hovered: Option<HexCoord>,
    projectiles: Vec<Projectile>,
    events: BattleEventLog,
}

impl<H: BattleHost> BattleSystem<H> {
    pub fn new(
        mut grid: HexGrid,
        host: H,
        catalog: &Catalog,
        setup: BattleSetup,
        options: BattleOptions,
    ) -> Result<Self> {
        let stage = catalog
            .stage(setup.chapter, setup.stage)
            .ok_or(TacticsError::UnknownStage {
                chapter: setup.chapter,
                stage: setup.stage,
            })?
            .clone();
        if setup.party.is_empty() {
            return Err(TacticsError::EmptyParty);
        }

        stage.paint(&mut grid);
        let deployment = stage.deployment_cells();

        let mut battle = Self {
            grid,
            host,
            config: options.config,
            formulas: options.formulas,
            strategy: options.strategy,
            units: Vec::new(),
            turn_order: Vec::new(),
            next_index: 0,
            current: None,
            phase: BattlePhase::ProcessingTurn,
            action: ActionState::default(),
            pending: Pending::None,
            latched: None,
            notified: false,
            round: 0,
            tick: 0,
            chapter: setup.chapter,
            stage: setup.stage,
            reward_gold: stage.reward_gold,
            deployment,
            camera_offset: Vec2::ZERO,
            auto_battle: options.auto_battle,
            hovered: None,
            projectiles: Vec::new(),
            events: BattleEventLog::new(),
        };

        for member in setup.party {
            battle.place_party_member(member);
        }

        for entry in &stage.enemies {
            battle.spawn_manifest_entry(catalog, entry, stage.enemy_level);
        }

        info!(
            chapter = battle.chapter,
            stage = battle.stage,
            units = battle.units.len(),
            "Battle started"
        );

        battle.check_end();
        if battle.latched.is_none() {
            battle.advance_turn();
        }
        battle.conclude_if_latched();
        Ok(battle)
    }

    // ---- construction helpers ----

    fn next_id(&self) -> UnitId {
        UnitId(self.units.len() as u32)
    }

    fn is_occupied(&self, hex: HexCoord) -> bool {
        self.units.iter().any(|u| u.is_alive() && u.position == hex)
    }

    /// Painted, passable, and free
    fn can_stand(&self, hex: HexCoord) -> bool {
        self.grid.is_defined(hex) && self.grid.terrain(hex).is_passable() && !self.is_occupied(hex)
    }

    fn place_party_member(&mut self, member: PartyMember) {
        let mut unit = member.unit;
        unit.id = self.next_id();
        unit.team = TeamId::PLAYER;
        unit.hp = unit.hp.clamp(0, unit.max_hp);
        unit.mp = unit.mp.clamp(0, unit.max_mp);

        let wanted = HexCoord::new(member.q, member.r);
        unit.position = if self.can_stand(wanted) {
            wanted
        } else if let Some(cell) = self.deployment.iter().copied().find(|c| self.can_stand(*c)) {
            cell
        } else if let Some(cell) = self.auto_place() {
            cell
        } else {
            warn!(unit = %unit.id, cell = %wanted, "No free cell for party member, stacking");
            wanted
        };
        self.units.push(unit);
    }

    fn spawn_manifest_entry(&mut self, catalog: &Catalog, raw: &str, level: i32) {
        let entry = match parse_manifest_entry(raw) {
            Ok(entry) => entry,
            Err(err) => {
                self.skip_spawn(raw, &err.to_string());
                return;
            }
        };

        for i in 0..entry.count {
            let mut unit = match catalog.spawn_unit(&entry.class_key, level, TeamId::ENEMY, self.formulas.as_ref()) {
                Ok(unit) => unit,
                Err(err) => {
                    self.skip_spawn(raw, &err.to_string());
                    return;
                }
            };

            let fixed = entry
                .position
                .filter(|hex| i == 0 && self.can_stand(*hex));
            let Some(cell) = fixed.or_else(|| self.auto_place()) else {
                self.skip_spawn(raw, "no free cell");
                return;
            };

            unit.id = self.next_id();
            unit.position = cell;
            unit.facing = cell.direction_to(&self.deployment_anchor());
            self.units.push(unit);
        }
    }

    fn skip_spawn(&mut self, raw: &str, reason: &str) {
        warn!(entry = %raw, %reason, "Skipping enemy spawn");
        self.log(
            BattleEventType::SpawnSkipped { entry: raw.to_string() },
            format!("Skipped '{raw}': {reason}"),
        );
    }

    /// Cells the deployment zone is measured from
    fn deployment_zone(&self) -> Vec<HexCoord> {
        if self.deployment.is_empty() {
            self.units.iter().filter(|u| u.is_player_side()).map(|u| u.position).collect()
        } else {
            self.deployment.clone()
        }
    }

    fn deployment_anchor(&self) -> HexCoord {
        self.deployment_zone().first().copied().unwrap_or_default()
    }

    /// Free defined cell farthest from the deployment zone; ties go to the
    /// first in (r, q) order
    fn auto_place(&self) -> Option<HexCoord> {
        let zone = self.deployment_zone();
        let mut best: Option<(u32, HexCoord)> = None;
        for (hex, terrain) in self.grid.sorted_hexes() {
            if !terrain.is_passable() || self.is_occupied(hex) || self.deployment.contains(&hex) {
                continue;
            }
            let gap = zone.iter().map(|z| z.distance(&hex)).min().unwrap_or(0);
            if best.map(|(d, _)| gap > d).unwrap_or(true) {
                best = Some((gap, hex));
            }
        }
        best.map(|(_, hex)| hex)
    }

    // ---- turn flow ----

    fn log(&mut self, event_type: BattleEventType, description: String) {
        self.events.push(event_type, description, self.tick, self.round);
    }

    fn index_of(&self, id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    fn is_ai_controlled(&self, unit: &Unit) -> bool {
        !unit.is_player_side() || self.auto_battle
    }

    fn start_round(&mut self) {
        self.round += 1;
        self.turn_order = compute_turn_order(&self.units, self.formulas.as_ref());
        self.next_index = 0;
        debug!(round = self.round, order = ?self.turn_order, "Round started");
        self.log(BattleEventType::RoundStarted, format!("Round {}", self.round));
    }

    /// Begin turns until one unit is left in control, or the battle is decided
    fn advance_turn(&mut self) {
        loop {
            if self.latched.is_some() || self.is_over() {
                return;
            }
            if self.next_index >= self.turn_order.len() {
                self.start_round();
                if self.turn_order.is_empty() {
                    return;
                }
            }
            let id = self.turn_order[self.next_index];
            self.next_index += 1;
            if self.begin_turn(id) {
                return;
            }
        }
    }

    /// Returns false when the unit loses its turn (stun or status death)
    fn begin_turn(&mut self, id: UnitId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.current = Some(id);
        self.action = ActionState::default();
        self.phase = BattlePhase::ProcessingTurn;
        self.pending = Pending::None;
        let name = self.units[idx].name.clone();
        debug!(unit = %id, %name, "Turn started");
        self.log(BattleEventType::TurnStarted { unit_id: id }, format!("{name}'s turn"));

        let unit = &mut self.units[idx];
        let max_hp = unit.max_hp;
        let position = unit.position;
        let report = tick_statuses(&mut unit.statuses, max_hp);
        unit.tick_cooldowns();

        for kind in &report.expired {
            self.log(
                BattleEventType::StatusExpired { unit_id: id, kind: *kind },
                format!("{name}'s {kind:?} wore off"),
            );
        }
        if report.damage > 0 {
            self.apply_hp_loss(id, report.damage, position);
        }
        if !self.units[idx].is_alive() {
            return false;
        }
        if report.healing > 0 {
            let gained = self.units[idx].gain_hp(report.healing);
            self.log(
                BattleEventType::UnitHealed { unit_id: id, amount: gained },
                format!("{name} regenerates {gained} HP"),
            );
        }
        if report.stunned {
            debug!(unit = %id, "Stunned, turn skipped");
            self.log(BattleEventType::TurnSkipped { unit_id: id }, format!("{name} is stunned"));
            return false;
        }

        self.action.reachable = self.compute_reachable(idx);
        self.camera_offset = -self.grid.surface_pixel(position);

        if self.is_ai_controlled(&self.units[idx]) {
            self.pending = Pending::AiDecision;
        } else {
            self.phase = BattlePhase::AwaitingInput;
        }
        true
    }

    fn compute_reachable(&self, idx: usize) -> Reachable {
        let unit = &self.units[idx];
        let budget = self
            .formulas
            .derived_stat(unit, CombatStat::Movement, true)
            .max(0.0)
            .floor() as u32;
        let occupied: AHashSet<HexCoord> = self
            .units
            .iter()
            .filter(|u| u.is_alive() && u.id != unit.id)
            .map(|u| u.position)
            .collect();
        let confine = self.config.confine_to_map;
        self.grid.reachable_set(unit.position, budget, |hex| {
            occupied.contains(&hex) || (confine && !self.grid.is_defined(hex))
        })
    }

    /// Queue what follows a committed action, or run it now when settling is off
    fn after_action(&mut self, then: AfterSettle) {
        if self.latched.is_some() {
            return;
        }
        self.phase = BattlePhase::ProcessingTurn;
        if self.config.turn_settle_ticks == 0 {
            self.pending = Pending::None;
            self.run_after(then);
        } else {
            self.pending = Pending::Settle {
                ticks_left: self.config.turn_settle_ticks,
                then,
            };
        }
    }

    fn run_after(&mut self, then: AfterSettle) {
        match then {
            AfterSettle::NextUnit => self.advance_turn(),
            AfterSettle::ResumeInput => {
                let ai = self
                    .current_unit()
                    .map(|u| self.is_ai_controlled(u))
                    .unwrap_or(false);
                if ai {
                    self.pending = Pending::AiDecision;
                } else {
                    self.phase = BattlePhase::AwaitingInput;
                }
            }
        }
    }

    // ---- HP and end of battle ----

    fn apply_hp_loss(&mut self, id: UnitId, amount: i32, source: HexCoord) -> i32 {
        let Some(idx) = self.index_of(id) else {
            return 0;
        };
        let unit = &mut self.units[idx];
        if !unit.is_alive() {
            return 0;
        }
        let lost = unit.lose_hp(amount);
        let died = !unit.is_alive();
        let name = unit.name.clone();

        self.log(
            BattleEventType::UnitDamaged {
                unit_id: id,
                amount: lost,
                source,
            },
            format!("{name} takes {lost} damage"),
        );
        if died {
            debug!(unit = %id, %name, "Unit died");
            self.log(BattleEventType::UnitDied { unit_id: id }, format!("{name} falls"));
            self.remove_from_order(id);
            self.check_end();
        }
        lost
    }

    fn remove_from_order(&mut self, id: UnitId) {
        if let Some(pos) = self.turn_order.iter().position(|u| *u == id) {
            self.turn_order.remove(pos);
            if pos < self.next_index {
                self.next_index -= 1;
            }
        }
    }

    /// Latch the outcome the first time one side has no one standing
    fn check_end(&mut self) {
        if self.latched.is_some() || self.is_over() {
            return;
        }
        let side_alive = |player: bool| {
            self.units
                .iter()
                .any(|u| u.is_player_side() == player && u.is_alive())
        };
        if !side_alive(false) {
            self.latched = Some(BattleOutcome::Victory);
        } else if !side_alive(true) {
            self.latched = Some(BattleOutcome::Defeat);
        }
    }

    fn conclude_if_latched(&mut self) {
        if let Some(outcome) = self.latched {
            if !self.is_over() {
                self.finish(outcome, false);
            }
        }
    }

    fn finish(&mut self, outcome: BattleOutcome, surrender: bool) {
        self.phase = BattlePhase::BattleOver { outcome, surrender };
        self.pending = Pending::None;
        self.action.armed_skill = None;
        self.latched = Some(outcome);
        let victory = outcome == BattleOutcome::Victory;
        info!(?outcome, surrender, round = self.round, "Battle ended");
        self.log(
            BattleEventType::BattleEnded { victory, surrender },
            if victory { "Victory".into() } else { "Defeat".into() },
        );

        if !self.notified {
            self.notified = true;
            let result = BattleResult {
                victory,
                surrender,
                chapter: self.chapter,
                stage: self.stage,
                reward_gold: if victory { self.reward_gold } else { 0 },
            };
            self.host.on_battle_end(&result);
        }
    }

    // ---- validation ----

    /// Index of the current unit if it may take player input right now
    fn ensure_input(&self) -> Result<usize> {
        match self.phase {
            BattlePhase::BattleOver { .. } => return Err(TacticsError::BattleOver),
            BattlePhase::ProcessingTurn => return Err(TacticsError::InputLocked),
            BattlePhase::AwaitingInput | BattlePhase::SkillTargeting { .. } => {}
        }
        self.ensure_current_alive()
    }

    fn ensure_current_alive(&self) -> Result<usize> {
        let id = self.current.ok_or(TacticsError::InputLocked)?;
        let idx = self.index_of(id).ok_or(TacticsError::UnitNotFound(id))?;
        if !self.units[idx].is_alive() {
            return Err(TacticsError::UnitDead(id));
        }
        Ok(idx)
    }

    fn check_skill_usable(&self, idx: usize, slot: usize) -> Result<&Skill> {
        if self.action.acted {
            return Err(TacticsError::ActionSpent);
        }
        let unit = &self.units[idx];
        let skill = unit.skills.get(slot).ok_or(TacticsError::UnknownSkill(slot))?;
        if !skill.is_ready() {
            return Err(TacticsError::SkillOnCooldown {
                skill: skill.id.clone(),
                turns: skill.cooldown_remaining,
            });
        }
        if unit.mp < skill.cost {
            return Err(TacticsError::InsufficientMp {
                need: skill.cost,
                have: unit.mp,
            });
        }
        if !has_valid_target(&self.grid, &self.units, unit, unit.position, skill) {
            return Err(TacticsError::NoValidTarget(skill.id.clone()));
        }
        Ok(skill)
    }

    // ---- player operations ----

    /// Arm a skill for targeting
    pub fn select_skill(&mut self, slot: usize) -> Result<()> {
        let idx = self.ensure_input()?;
        self.check_skill_usable(idx, slot)?;
        self.phase = BattlePhase::SkillTargeting { skill: slot };
        self.action.armed_skill = Some(slot);
        Ok(())
    }

    pub fn cancel_skill(&mut self) -> Result<()> {
        self.ensure_input()?;
        if !matches!(self.phase, BattlePhase::SkillTargeting { .. }) {
            return Err(TacticsError::NoSkillArmed);
        }
        self.phase = BattlePhase::AwaitingInput;
        self.action.armed_skill = None;
        Ok(())
    }

    /// Resolve the armed skill at `target`. Ends the unit's turn.
    pub fn confirm_target(&mut self, target: HexCoord) -> Result<()> {
        let idx = self.ensure_input()?;
        let BattlePhase::SkillTargeting { skill: slot } = self.phase else {
            return Err(TacticsError::NoSkillArmed);
        };
        let skill = self.check_skill_usable(idx, slot)?;
        if !target_in_range(&self.grid, self.units[idx].position, skill, target) {
            return Err(TacticsError::OutOfRange(target));
        }

        self.resolve_skill(idx, slot, target);
        self.after_action(AfterSettle::NextUnit);
        self.conclude_if_latched();
        Ok(())
    }

    /// Move the current unit. It keeps its action afterwards.
    pub fn move_to(&mut self, destination: HexCoord) -> Result<()> {
        let idx = self.ensure_input()?;
        if matches!(self.phase, BattlePhase::SkillTargeting { .. }) {
            return Err(TacticsError::SkillArmed);
        }
        self.perform_move(idx, destination)?;
        self.after_action(AfterSettle::ResumeInput);
        Ok(())
    }

    pub fn end_turn(&mut self) -> Result<()> {
        self.ensure_input()?;
        self.action.armed_skill = None;
        self.after_action(AfterSettle::NextUnit);
        self.conclude_if_latched();
        Ok(())
    }

    /// Concede. Allowed at any point before the battle ends; HP is untouched.
    pub fn surrender(&mut self) -> Result<()> {
        if self.is_over() {
            return Err(TacticsError::BattleOver);
        }
        self.finish(BattleOutcome::Defeat, true);
        Ok(())
    }

    pub fn hover(&mut self, cell: Option<HexCoord>) {
        self.hovered = cell;
    }

    pub fn handle_input(&mut self, input: impl Into<BattleInput>) -> Result<()> {
        let input = input.into();
        if self.is_processing() && !input.bypasses_lock() {
            debug!(?input, "Input discarded while processing");
            return Err(TacticsError::InputLocked);
        }
        match input {
            BattleInput::SelectSkill(cmd) => self.select_skill(cmd.slot),
            BattleInput::CancelSkill(_) => self.cancel_skill(),
            BattleInput::ConfirmTarget(cmd) => self.confirm_target(cmd.target),
            BattleInput::MoveTo(cmd) => self.move_to(cmd.destination),
            BattleInput::EndTurn(_) => self.end_turn(),
            BattleInput::Surrender(_) => self.surrender(),
            BattleInput::Hover(cmd) => {
                self.hover(cmd.cell);
                Ok(())
            }
        }
    }

    /// Hand control of the player side to the AI, or take it back
    pub fn set_auto_battle(&mut self, auto_battle: bool) {
        self.auto_battle = auto_battle;
        let waiting = matches!(
            self.phase,
            BattlePhase::AwaitingInput | BattlePhase::SkillTargeting { .. }
        );
        if auto_battle && waiting {
            self.action.armed_skill = None;
            self.phase = BattlePhase::ProcessingTurn;
            self.pending = Pending::AiDecision;
        }
    }

    // ---- action resolution ----

    fn perform_move(&mut self, idx: usize, destination: HexCoord) -> Result<()> {
        if self.action.moved {
            return Err(TacticsError::MovementSpent);
        }
        let origin = self.units[idx].position;
        if destination == origin || !self.action.reachable.contains(destination) {
            return Err(TacticsError::Unreachable(destination));
        }
        let path = self
            .action
            .reachable
            .path_to(destination)
            .unwrap_or_else(|| vec![origin, destination]);
        let from = path.len().checked_sub(2).map(|i| path[i]).unwrap_or(origin);

        let unit = &mut self.units[idx];
        unit.position = destination;
        unit.facing = from.direction_to(&destination);
        let id = unit.id;
        let name = unit.name.clone();

        self.action.moved = true;
        self.action.reachable = Reachable::origin_only(destination);
        self.camera_offset = -self.grid.surface_pixel(destination);
        debug!(unit = %id, from = %origin, to = %destination, "Unit moved");
        self.log(
            BattleEventType::UnitMoved { unit_id: id, path },
            format!("{name} moves to {destination}"),
        );
        Ok(())
    }

    fn resolve_skill(&mut self, idx: usize, slot: usize, target: HexCoord) {
        let caster = self.units[idx].clone();
        let skill = caster.skills[slot].clone();
        let origin = caster.position;
        let target = if skill.effect.mode == TargetMode::SelfOnly {
            origin
        } else {
            target
        };
        let affected = affected_units(&self.grid, &self.units, &caster, origin, &skill, target);

        let unit = &mut self.units[idx];
        unit.mp = (unit.mp - skill.cost).max(0);
        unit.skills[slot].trigger_cooldown();
        if target != origin {
            unit.facing = origin.direction_to(&target);
        }
        self.action.acted = true;
        self.action.armed_skill = None;

        debug!(unit = %caster.id, skill = %skill.id, %target, hits = affected.len(), "Skill used");
        self.log(
            BattleEventType::SkillUsed {
                unit_id: caster.id,
                skill: skill.id.clone(),
                target,
                affected: affected.clone(),
            },
            format!("{} uses {}", caster.name, skill.name),
        );

        if self.grid.distance(origin, target) > MELEE_REACH {
            self.projectiles
                .push(Projectile::new(origin, target, self.config.projectile_speed));
            self.log(
                BattleEventType::ProjectileSpawned {
                    origin,
                    destination: target,
                },
                format!("Projectile {origin} -> {target}"),
            );
        }

        for id in &affected {
            self.apply_effect(&caster, *id, skill.effect.kind, origin);
        }
        if let Some(secondary) = skill.secondary {
            for id in &affected {
                self.apply_effect(&caster, *id, secondary, origin);
            }
        }
    }

    fn apply_effect(&mut self, caster: &Unit, target: UnitId, kind: EffectKind, source: HexCoord) {
        let Some(idx) = self.index_of(target) else {
            return;
        };
        if !self.units[idx].is_alive() {
            return;
        }
        match kind {
            EffectKind::Damage { power, element } => {
                let amount = damage_amount(self.formulas.as_ref(), caster, &self.units[idx], power, element);
                self.apply_hp_loss(target, amount, source);
            }
            EffectKind::Heal { power } => {
                let amount = heal_amount(self.formulas.as_ref(), caster, power);
                let unit = &mut self.units[idx];
                let gained = unit.gain_hp(amount);
                let name = unit.name.clone();
                self.log(
                    BattleEventType::UnitHealed {
                        unit_id: target,
                        amount: gained,
                    },
                    format!("{name} recovers {gained} HP"),
                );
            }
            EffectKind::Status { kind, duration } => {
                let unit = &mut self.units[idx];
                unit.add_status(kind, duration);
                let name = unit.name.clone();
                self.log(
                    BattleEventType::StatusApplied {
                        unit_id: target,
                        kind,
                        duration,
                    },
                    format!("{name} is afflicted with {kind:?}"),
                );
            }
        }
    }

    // ---- AI ----

    fn run_ai_turn(&mut self) {
        let Some(id) = self.current else {
            return;
        };
        let decision = {
            let view = BattleView {
                grid: &self.grid,
                units: &self.units,
                formulas: self.formulas.as_ref(),
                reachable: &self.action.reachable,
                round: self.round,
                confine_to_map: self.config.confine_to_map,
            };
            self.strategy.decide(&view, id)
        };
        debug!(unit = %id, ?decision, "AI decision");

        let Ok(idx) = self.ensure_current_alive() else {
            self.after_action(AfterSettle::NextUnit);
            return;
        };

        if let Some(destination) = decision.destination {
            if destination != self.units[idx].position {
                if let Err(err) = self.perform_move(idx, destination) {
                    debug!(unit = %id, %err, "Dropping AI move");
                }
            }
        }

        if let Some(action) = decision.action {
            let usable = self.check_skill_usable(idx, action.skill).and_then(|skill| {
                if target_in_range(&self.grid, self.units[idx].position, skill, action.target) {
                    Ok(())
                } else {
                    Err(TacticsError::OutOfRange(action.target))
                }
            });
            match usable {
                Ok(()) => self.resolve_skill(idx, action.skill, action.target),
                Err(err) => debug!(unit = %id, %err, "Dropping AI action"),
            }
        }

        self.after_action(AfterSettle::NextUnit);
    }

    // ---- clock ----

    /// Advance one fixed simulation step
    pub fn tick(&mut self) {
        if self.is_over() {
            return;
        }
        self.tick += 1;
        match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::None => {}
            Pending::AiDecision => self.run_ai_turn(),
            Pending::Settle { ticks_left, then } => {
                if ticks_left <= 1 {
                    self.run_after(then);
                } else {
                    self.pending = Pending::Settle {
                        ticks_left: ticks_left - 1,
                        then,
                    };
                }
            }
        }
        self.conclude_if_latched();
    }

    /// Tick until the battle waits on player input or ends. Returns the
    /// number of ticks spent, capped by `BattleConfig::max_idle_ticks`.
    pub fn run_until_idle(&mut self) -> u64 {
        let mut spent = 0;
        while self.phase == BattlePhase::ProcessingTurn && spent < self.config.max_idle_ticks {
            self.tick();
            spent += 1;
        }
        if spent >= self.config.max_idle_ticks {
            warn!(spent, "Battle did not settle within the tick budget");
        }
        spent
    }

    // ---- read surface ----

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_processing(&self) -> bool {
        self.phase == BattlePhase::ProcessingTurn
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, BattlePhase::BattleOver { .. })
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::BattleOver { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    pub fn current_unit_id(&self) -> Option<UnitId> {
        self.current
    }

    pub fn current_unit(&self) -> Option<&Unit> {
        self.current.and_then(|id| self.unit(id))
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn turn_order(&self) -> &[UnitId] {
        &self.turn_order
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    pub fn action_state(&self) -> &ActionState {
        &self.action
    }

    pub fn reachable(&self) -> &Reachable {
        &self.action.reachable
    }

    pub fn armed_skill(&self) -> Option<usize> {
        self.action.armed_skill
    }

    pub fn hovered(&self) -> Option<HexCoord> {
        self.hovered
    }

    /// Cells the armed skill would touch if confirmed on the hovered cell
    pub fn targeting_preview(&self) -> Vec<HexCoord> {
        let (Some(slot), Some(target), Some(unit)) = (self.action.armed_skill, self.hovered, self.current_unit()) else {
            return Vec::new();
        };
        match unit.skills.get(slot) {
            Some(skill) if target_in_range(&self.grid, unit.position, skill, target) => {
                affected_cells(&self.grid, unit.position, skill, target)
            }
            _ => Vec::new(),
        }
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.camera_offset
    }

    pub fn auto_battle(&self) -> bool {
        self.auto_battle
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn reward_gold(&self) -> u32 {
        self.reward_gold
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Zoom and tilt are the only grid state the renderer may change
    pub fn projection_mut(&mut self) -> &mut crate::grid::projection::Projection {
        self.grid.projection_mut()
    }

    pub fn formulas(&self) -> &dyn Formulas {
        self.formulas.as_ref()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Renderer-owned: advance and retire through `render::retire_projectiles`
    pub fn projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.projectiles
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain()
    }

    /// Give back the grid, the host, and the roster
    pub fn into_parts(self) -> (HexGrid, H, Vec<Unit>) {
        (self.grid, self.host, self.units)
    }
}
