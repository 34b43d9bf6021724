use super::AutomatonError;
use std::{collections::HashMap, fmt};

/// A named automaton state with its roles.
///
/// States compare by name and both flags, so the same name with different roles is a different state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
	name: String,
	is_starting: bool,
	is_accepting: bool,
}

impl State {
	pub fn new<N>(name: N, is_starting: bool, is_accepting: bool) -> Self
	where
		N: Into<String>,
	{
		Self {
			name: name.into(),
			is_starting,
			is_accepting,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_starting(&self) -> bool {
		self.is_starting
	}

	pub fn is_accepting(&self) -> bool {
		self.is_accepting
	}
}

impl fmt::Display for State {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if self.is_starting {
			write!(f, ">")?;
		}
		write!(f, "{}", self.name)?;
		if self.is_accepting {
			write!(f, "*")?;
		}
		Ok(())
	}
}

/// Stable handle of a state inside a [`StateArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

#[derive(Clone, Debug)]
enum Slot {
	/// Referenced by a transition before the state itself was added.
	Reserved(String),
	Live(State),
	Removed(String),
}

impl Slot {
	fn name(&self) -> &str {
		match self {
			Self::Reserved(name) | Self::Removed(name) => name,
			Self::Live(state) => state.name(),
		}
	}
}

/// Owns the states of one automaton.
///
/// Every name maps to one handle for the lifetime of the arena. Removing a state leaves a
/// tombstone behind, so transitions holding its handle resolve to
/// `AutomatonError::DanglingTarget` until a state with that name is added again.
#[derive(Clone, Debug, Default)]
pub struct StateArena {
	slots: Vec<Slot>,
	index: HashMap<String, StateId>,
	start: Option<StateId>,
}

impl StateArena {
	/// Returns the handle for a name, reserving one if the name is unknown.
	pub(crate) fn intern(&mut self, name: &str) -> StateId {
		if let Some(id) = self.index.get(name) {
			return *id;
		}
		let id = StateId(self.slots.len());
		self.slots.push(Slot::Reserved(name.to_owned()));
		self.index.insert(name.to_owned(), id);
		id
	}

	/// Adds a state, replacing a live state with the same name.
	/// Returns an `AutomatonError::DuplicateStartState` error if another state is already starting.
	pub(crate) fn insert(&mut self, state: State) -> Result<StateId, AutomatonError> {
		let existing = self.id(state.name());
		if state.is_starting() {
			if let Some(start) = self.start {
				if Some(start) != existing {
					return Err(AutomatonError::DuplicateStartState(state.name));
				}
			}
		}
		let id = self.intern(state.name());
		if state.is_starting() {
			self.start = Some(id);
		} else if self.start == Some(id) {
			self.start = None;
		}
		self.slots[id.0] = Slot::Live(state);
		Ok(id)
	}

	/// Tombstones a live state. The name keeps its handle, so adding the state again revives
	/// every transition pointing at it.
	pub(crate) fn remove(&mut self, name: &str) -> Result<(StateId, State), AutomatonError> {
		let id = self
			.id(name)
			.ok_or_else(|| AutomatonError::InexistentState(name.to_owned()))?;
		if self.start == Some(id) {
			self.start = None;
		}
		match std::mem::replace(&mut self.slots[id.0], Slot::Removed(name.to_owned())) {
			Slot::Live(state) => Ok((id, state)),
			slot => Err(AutomatonError::InexistentState(slot.name().to_owned())),
		}
	}

	/// Resolves a handle to its state.
	/// Returns an `AutomatonError::DanglingTarget` error if the state was never added or was removed.
	pub fn get(&self, id: StateId) -> Result<&State, AutomatonError> {
		match self.slots.get(id.0) {
			Some(Slot::Live(state)) => Ok(state),
			Some(slot) => Err(AutomatonError::DanglingTarget(slot.name().to_owned())),
			None => Err(AutomatonError::DanglingTarget(self.label(id))),
		}
	}

	/// Returns the handle of a live state.
	pub fn id(&self, name: &str) -> Option<StateId> {
		self.index
			.get(name)
			.copied()
			.filter(|id| matches!(self.slots[id.0], Slot::Live(_)))
	}

	pub fn find(&self, name: &str) -> Option<&State> {
		self.id(name).and_then(|id| self.get(id).ok())
	}

	/// Checks whether a name is taken by a live state, a pending reference or a tombstone.
	pub fn is_known(&self, name: &str) -> bool {
		self.index.contains_key(name)
	}

	/// Returns the name behind a handle of this arena, live or not.
	pub fn name(&self, id: StateId) -> Option<&str> {
		self.slots.get(id.0).map(Slot::name)
	}

	/// Name for error messages, `#N` for a handle from another arena.
	pub(crate) fn label(&self, id: StateId) -> String {
		self.name(id)
			.map_or_else(|| format!("#{}", id.0), str::to_owned)
	}

	pub fn start(&self) -> Option<StateId> {
		self.start
	}

	pub fn start_state(&self) -> Option<&State> {
		self.start.and_then(|id| self.get(id).ok())
	}

	/// Iterates over live states in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> {
		self.slots
			.iter()
			.enumerate()
			.filter_map(|(index, slot)| match slot {
				Slot::Live(state) => Some((StateId(index), state)),
				_ => None,
			})
	}

	pub fn len(&self) -> usize {
		self.iter().count()
	}

	pub fn is_empty(&self) -> bool {
		self.iter().next().is_none()
	}
}
