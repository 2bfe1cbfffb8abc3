//! Regex automaton for term dictionary traversal
//!
//! The pattern is compiled into an anchored dense DFA and driven byte by
//! byte by the FST search. A term matches only when the whole key is
//! accepted, so `kev.*` matches `kevin` but not `akevin`.
//!
//! Compilation is bounded by [`RegexConfig::size_limit`]; patterns whose
//! NFA or DFA would grow past it are rejected as invalid.

use fst::Automaton;
use regex_automata::dfa::{dense, Automaton as _, StartKind};
use regex_automata::nfa::thompson;
use regex_automata::util::primitives::StateID;
use regex_automata::util::{start, syntax};
use regex_automata::{Anchored, MatchKind};

use crate::config::RegexConfig;
use crate::error::{IndexError, Result};

/// A compiled leaf pattern usable with `fst::Map::search`
#[derive(Clone, Debug)]
pub struct RegexAutomaton {
    pattern: String,
    dfa: dense::DFA<Vec<u32>>,
    start: StateID,
}

impl RegexAutomaton {
    /// Compile `pattern`; fails with [`IndexError::InvalidPattern`]
    pub fn compile(pattern: &str, config: &RegexConfig) -> Result<Self> {
        let invalid = |reason: String| IndexError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };
        let limit = Some(config.size_limit);

        let dfa = dense::Builder::new()
            .configure(
                dense::Config::new()
                    .start_kind(StartKind::Anchored)
                    // keep every state that can still reach a match alive
                    .match_kind(MatchKind::All)
                    .minimize(config.minimize)
                    .determinize_size_limit(limit)
                    .dfa_size_limit(limit),
            )
            .syntax(
                syntax::Config::new()
                    .case_insensitive(config.case_insensitive)
                    .unicode(config.unicode)
                    .nest_limit(config.nest_limit),
            )
            .thompson(thompson::Config::new().nfa_size_limit(limit))
            .build(pattern)
            .map_err(|e| invalid(e.to_string()))?;

        let start = dfa
            .start_state(&start::Config::new().anchored(Anchored::Yes))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            dfa,
            start,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Heap bytes held by the compiled DFA
    pub fn memory_usage(&self) -> usize {
        self.dfa.memory_usage()
    }

    /// Whether the whole of `input` is accepted
    pub fn is_full_match(&self, input: &[u8]) -> bool {
        let mut state = self.start();
        for &byte in input {
            if !self.can_match(&state) {
                return false;
            }
            state = self.accept(&state, byte);
        }
        self.is_match(&state)
    }
}

impl Automaton for RegexAutomaton {
    type State = StateID;

    fn start(&self) -> StateID {
        self.start
    }

    // Matches are reported one transition late, so close the key first
    fn is_match(&self, state: &StateID) -> bool {
        self.dfa.is_match_state(self.dfa.next_eoi_state(*state))
    }

    fn can_match(&self, state: &StateID) -> bool {
        !self.dfa.is_dead_state(*state)
    }

    fn accept(&self, state: &StateID, byte: u8) -> StateID {
        self.dfa.next_state(*state, byte)
    }
}
