use super::{Alphabet, AutomatonError, State, StateArena, StateId};
use std::collections::{BTreeSet, HashMap};

/// Relation from (state, symbol) to the stored target `T`.
///
/// Owns the state arena of its automaton. Targets are stored as handles, so a transition may
/// reference a state that is added later; the reference is resolved when it is evaluated.
#[derive(Clone, Debug)]
pub struct TransitionFunction<T> {
	alphabet: Alphabet,
	states: StateArena,
	rows: HashMap<StateId, Vec<Option<T>>>,
}

/// Transition function with at most one target per state and symbol.
pub type DeterministicTransitionFunction = TransitionFunction<StateId>;

/// Transition function with a set of targets per state and symbol.
pub type NonDeterministicTransitionFunction = TransitionFunction<BTreeSet<StateId>>;

impl<T> TransitionFunction<T>
where
	T: Clone,
{
	pub fn new(alphabet: Alphabet) -> Self {
		Self {
			alphabet,
			states: StateArena::default(),
			rows: HashMap::new(),
		}
	}

	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	pub fn states(&self) -> &StateArena {
		&self.states
	}

	/// Registers a state without any outgoing transitions.
	pub fn add_state(&mut self, state: State) -> Result<StateId, AutomatonError> {
		let id = self.states.insert(state)?;
		self.rows.insert(id, vec![None; self.alphabet.len()]);
		Ok(id)
	}

	/// Removes a state and its own transitions.
	///
	/// Transitions of other states pointing at it are left alone and become dangling.
	pub fn remove_state(&mut self, name: &str) -> Result<State, AutomatonError> {
		let (id, state) = self.states.remove(name)?;
		self.rows.remove(&id);
		Ok(state)
	}

	/// Returns the alphabet position of a symbol or an `AutomatonError::InvalidSymbol` error.
	pub fn position(&self, symbol: &str) -> Result<usize, AutomatonError> {
		self.alphabet
			.position(symbol)
			.ok_or_else(|| AutomatonError::InvalidSymbol(symbol.to_owned()))
	}

	/// Returns the raw stored entry, after checking the source state is live.
	fn entry(&self, state: StateId, position: usize) -> Result<Option<&T>, AutomatonError> {
		self.states.get(state)?;
		Ok(self
			.rows
			.get(&state)
			.and_then(|row| row.get(position))
			.and_then(Option::as_ref))
	}

	fn row_mut(&mut self, state: StateId) -> Result<&mut Vec<Option<T>>, AutomatonError> {
		let name = self.states.get(state)?.name().to_owned();
		self.rows
			.get_mut(&state)
			.ok_or(AutomatonError::InexistentState(name))
	}

	fn check_target_count(&self, state: StateId, found: usize) -> Result<(), AutomatonError> {
		if found == self.alphabet.len() {
			Ok(())
		} else {
			Err(AutomatonError::InvalidTargetCount {
				state: self.states.label(state),
				expected: self.alphabet.len(),
				found,
			})
		}
	}

	fn symbol(&self, position: usize) -> String {
		self.alphabet
			.symbols()
			.get(position)
			.cloned()
			.unwrap_or_default()
	}
}

impl TransitionFunction<StateId> {
	/// Binds one target per alphabet symbol, in alphabet order.
	pub fn set_transitions_for_state(
		&mut self,
		state: StateId,
		targets: &[&str],
	) -> Result<(), AutomatonError> {
		self.check_target_count(state, targets.len())?;
		let targets: Vec<_> = targets
			.iter()
			.map(|target| Some(self.states.intern(target)))
			.collect();
		*self.row_mut(state)? = targets;
		Ok(())
	}

	/// Binds the target of a single symbol.
	pub fn set_transition(
		&mut self,
		state: StateId,
		symbol: &str,
		target: &str,
	) -> Result<(), AutomatonError> {
		let position = self.position(symbol)?;
		let target = self.states.intern(target);
		self.row_mut(state)?[position] = Some(target);
		Ok(())
	}

	/// Makes the transition of a single symbol undefined.
	pub fn clear_transition(&mut self, state: StateId, symbol: &str) -> Result<(), AutomatonError> {
		let position = self.position(symbol)?;
		self.row_mut(state)?[position] = None;
		Ok(())
	}

	/// Returns the state reached from `state` by `symbol`.
	pub fn evaluate(&self, state: StateId, symbol: &str) -> Result<&State, AutomatonError> {
		let position = self.position(symbol)?;
		let target = self.target_at(state, position)?;
		self.states.get(target)
	}

	/// Returns the live target of a transition, or `None` if it is undefined.
	pub(crate) fn defined_target_at(
		&self,
		state: StateId,
		position: usize,
	) -> Result<Option<StateId>, AutomatonError> {
		match self.entry(state, position)? {
			Some(target) => {
				self.states.get(*target)?;
				Ok(Some(*target))
			}
			None => Ok(None),
		}
	}

	/// Returns the live target of a transition.
	pub(crate) fn target_at(&self, state: StateId, position: usize) -> Result<StateId, AutomatonError> {
		self.defined_target_at(state, position)?
			.ok_or_else(|| AutomatonError::UndefinedTransition {
				state: self.states.label(state),
				symbol: self.symbol(position),
			})
	}

	/// Returns the stored target name without resolving it.
	pub fn target_name(&self, state: StateId, position: usize) -> Option<&str> {
		self.rows
			.get(&state)
			.and_then(|row| row.get(position))
			.and_then(|target| target.as_ref())
			.and_then(|target| self.states.name(*target))
	}

	/// Points every transition into `from` at `to` instead.
	pub(crate) fn redirect(&mut self, from: &BTreeSet<StateId>, to: StateId) {
		for row in self.rows.values_mut() {
			for target in row.iter_mut().flatten() {
				if from.contains(target) {
					*target = to;
				}
			}
		}
	}
}

impl TransitionFunction<BTreeSet<StateId>> {
	/// Binds one set of targets per alphabet symbol, in alphabet order.
	pub fn set_transitions_for_state(
		&mut self,
		state: StateId,
		targets: &[&[&str]],
	) -> Result<(), AutomatonError> {
		self.check_target_count(state, targets.len())?;
		let targets: Vec<_> = targets
			.iter()
			.map(|set| Some(set.iter().map(|target| self.states.intern(target)).collect()))
			.collect();
		*self.row_mut(state)? = targets;
		Ok(())
	}

	/// Returns the states reached from `state` by `symbol`, empty if there is no transition.
	pub fn evaluate(&self, state: StateId, symbol: &str) -> Result<Vec<&State>, AutomatonError> {
		let position = self.position(symbol)?;
		self.targets_at(state, position)?
			.into_iter()
			.map(|target| self.states.get(target))
			.collect()
	}

	/// Returns the live targets of a transition.
	pub(crate) fn targets_at(
		&self,
		state: StateId,
		position: usize,
	) -> Result<BTreeSet<StateId>, AutomatonError> {
		match self.entry(state, position)? {
			Some(targets) => {
				for target in targets {
					self.states.get(*target)?;
				}
				Ok(targets.clone())
			}
			None => Ok(BTreeSet::new()),
		}
	}

	/// Returns the stored target names without resolving them.
	pub fn target_names(&self, state: StateId, position: usize) -> Vec<&str> {
		self.rows
			.get(&state)
			.and_then(|row| row.get(position))
			.and_then(|targets| targets.as_ref())
			.map(|targets| {
				targets
					.iter()
					.filter_map(|target| self.states.name(*target))
					.collect()
			})
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use maplit::btreeset;

	fn binary() -> Alphabet {
		Alphabet::new(vec!["0", "1"]).unwrap()
	}

	#[test]
	fn deterministic() {
		let mut delta = DeterministicTransitionFunction::new(binary());
		let q0 = delta.add_state(State::new("q0", true, false)).unwrap();
		delta.set_transitions_for_state(q0, &["q0", "q1"]).unwrap();

		// q1 is referenced but not yet added
		assert_eq!(
			Err(AutomatonError::DanglingTarget("q1".into())),
			delta.evaluate(q0, "1")
		);

		let q1 = delta.add_state(State::new("q1", false, true)).unwrap();
		assert_eq!("q1", delta.evaluate(q0, "1").unwrap().name());
		assert_eq!(
			Err(AutomatonError::UndefinedTransition {
				state: "q1".into(),
				symbol: "0".into()
			}),
			delta.evaluate(q1, "0"),
			"Missing transition not reported"
		);
		assert_eq!(
			Err(AutomatonError::InvalidSymbol("2".into())),
			delta.evaluate(q0, "2")
		);

		delta.remove_state("q1").unwrap();
		assert_eq!(
			Err(AutomatonError::DanglingTarget("q1".into())),
			delta.evaluate(q0, "1"),
			"Removed state still reachable"
		);
		assert_eq!(Some("q1"), delta.target_name(q0, 1));
	}

	#[test]
	fn target_count() {
		let mut delta = DeterministicTransitionFunction::new(binary());
		let q0 = delta.add_state(State::new("q0", false, false)).unwrap();
		assert_eq!(
			Err(AutomatonError::InvalidTargetCount {
				state: "q0".into(),
				expected: 2,
				found: 1
			}),
			delta.set_transitions_for_state(q0, &["q0"])
		);
	}

	#[test]
	fn non_deterministic() {
		let mut delta = NonDeterministicTransitionFunction::new(binary());
		let q0 = delta.add_state(State::new("q0", true, false)).unwrap();
		let q1 = delta.add_state(State::new("q1", false, true)).unwrap();
		delta
			.set_transitions_for_state(q0, &[&["q0"], &["q0", "q1"]])
			.unwrap();

		assert_eq!(btreeset! {q0, q1}, delta.targets_at(q0, 1).unwrap());
		assert!(
			delta.evaluate(q1, "0").unwrap().is_empty(),
			"Missing transition not empty"
		);

		delta.set_transitions_for_state(q1, &[&["q2"], &[]]).unwrap();
		assert_eq!(
			Err(AutomatonError::DanglingTarget("q2".into())),
			delta.evaluate(q1, "0")
		);
		assert_eq!(vec!["q2"], delta.target_names(q1, 0));
	}

	#[test]
	fn redirect() {
		let mut delta = DeterministicTransitionFunction::new(binary());
		let q0 = delta.add_state(State::new("q0", true, false)).unwrap();
		let q1 = delta.add_state(State::new("q1", false, false)).unwrap();
		delta.set_transitions_for_state(q0, &["q1", "q1"]).unwrap();
		delta.set_transitions_for_state(q1, &["q0", "q1"]).unwrap();

		delta.remove_state("q1").unwrap();
		let merged = delta.add_state(State::new("m", false, true)).unwrap();
		delta.set_transitions_for_state(merged, &["q0", "m"]).unwrap();
		delta.redirect(&btreeset! {q1}, merged);

		assert_eq!(merged, delta.target_at(q0, 0).unwrap());
		assert_eq!(Some("m"), delta.target_name(q0, 1));
		assert!(delta.evaluate(q0, "1").unwrap().is_accepting());
	}
}
