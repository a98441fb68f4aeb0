//! Recursion driver
//!
//! Fibonacci, factorial and Towers of Hanoi, evaluated on an explicit frame
//! stack. Every call records exactly one step, parented to its caller's step,
//! and walks the call lifecycle:
//!
//! ```text
//! Pending -> Active -> (children) -> Returning -> Complete
//! Pending -> Active -> Complete              (base case)
//! ```
//!
//! A child's whole subtree is recorded before its parent turns `Returning`.

use crate::config::EngineConfig;
use crate::engine::{
    CallStatus, Driver, EngineError, Result, RunToken, StateContainer, StepId, Visualization,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    BaseCase,
}

impl CallKind {
    pub fn label(self) -> &'static str {
        match self {
            CallKind::Call => "call",
            CallKind::BaseCase => "base",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HanoiMove {
    pub disk: u32,
    pub from: char,
    pub to: char,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Peg {
    pub name: char,
    /// Bottom disk first
    pub disks: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecursionView {
    /// Labels of the calls currently on the stack, outermost first
    pub call_stack: Vec<String>,
    pub pegs: Vec<Peg>,
    pub moves: Vec<HanoiMove>,
}

impl RecursionView {
    fn peg_mut(&mut self, name: char) -> Option<&mut Peg> {
        self.pegs.iter_mut().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Recursion;

impl Visualization for Recursion {
    type Kind = CallKind;
    type Snapshot = RecursionView;
    /// Fibonacci or factorial value, or number of Hanoi moves made by the call
    type Output = u64;
    type Solution = u64;
    type View = RecursionView;
}

#[derive(Debug, Clone, Copy)]
enum Call {
    Fibonacci(u32),
    Factorial(u32),
    Hanoi {
        disks: u32,
        from: char,
        to: char,
        via: char,
    },
}

impl Call {
    fn label(&self) -> String {
        match *self {
            Call::Fibonacci(n) => format!("fibonacci({})", n),
            Call::Factorial(n) => format!("factorial({})", n),
            Call::Hanoi {
                disks,
                from,
                to,
                via,
            } => format!("hanoi({}, {}, {}, {})", disks, from, to, via),
        }
    }

    fn children(&self) -> Vec<Call> {
        match *self {
            Call::Fibonacci(n) if n > 1 => vec![Call::Fibonacci(n - 1), Call::Fibonacci(n - 2)],
            Call::Factorial(n) if n > 1 => vec![Call::Factorial(n - 1)],
            Call::Hanoi {
                disks,
                from,
                to,
                via,
            } if disks > 1 => vec![
                Call::Hanoi {
                    disks: disks - 1,
                    from,
                    to: via,
                    via: to,
                },
                Call::Hanoi {
                    disks: 1,
                    from,
                    to,
                    via,
                },
                Call::Hanoi {
                    disks: disks - 1,
                    from: via,
                    to,
                    via: from,
                },
            ],
            _ => Vec::new(),
        }
    }

    /// Combine the children's results into this call's result
    fn result(&self, children: &[u64]) -> Result<u64> {
        let overflow = || EngineError::Overflow {
            operation: self.label(),
        };
        match *self {
            Call::Fibonacci(n) if n <= 1 => Ok(n as u64),
            Call::Factorial(n) if n <= 1 => Ok(1),
            Call::Hanoi { disks: 1, .. } => Ok(1),
            Call::Fibonacci(_) | Call::Hanoi { .. } => children
                .iter()
                .try_fold(0u64, |acc, &r| acc.checked_add(r))
                .ok_or_else(overflow),
            Call::Factorial(n) => children
                .first()
                .and_then(|&r| r.checked_mul(n as u64))
                .ok_or_else(overflow),
        }
    }
}

/// A call in progress
struct Frame {
    call: Call,
    id: StepId,
    level: usize,
    pending: std::vec::IntoIter<Call>,
    results: Vec<u64>,
    base: bool,
}

pub struct RecursionDriver {
    state: StateContainer<Recursion>,
}

impl RecursionDriver {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        RecursionDriver {
            state: StateContainer::new(RecursionView::default(), config.delay),
        }
    }

    pub fn view(&self) -> &RecursionView {
        self.state.view()
    }

    /// Naive doubly recursive Fibonacci; `fibonacci(n)` makes fib(n+1)*2-1 calls
    pub async fn fibonacci(&mut self, n: u32) -> Result<u64> {
        let run = self.state.start_run();
        *self.state.view_mut() = RecursionView::default();
        let value = self.evaluate(&run, Call::Fibonacci(n)).await?;
        self.state
            .finish(Some(value), format!("fibonacci({}) = {}", n, value));
        Ok(value)
    }

    /// Fails with [`EngineError::Overflow`] once the product leaves `u64`
    pub async fn factorial(&mut self, n: u32) -> Result<u64> {
        let run = self.state.start_run();
        *self.state.view_mut() = RecursionView::default();
        let value = self.evaluate(&run, Call::Factorial(n)).await?;
        self.state
            .finish(Some(value), format!("factorial({}) = {}", n, value));
        Ok(value)
    }

    /// Move `disks` disks from peg `from` to peg `to`; returns the moves in order
    pub async fn hanoi(
        &mut self,
        disks: u32,
        from: char,
        to: char,
        via: char,
    ) -> Result<Vec<HanoiMove>> {
        if from == to || from == via || to == via {
            return Err(EngineError::invalid(format!(
                "pegs must be distinct, got {}, {}, {}",
                from, to, via
            )));
        }
        let run = self.state.start_run();
        *self.state.view_mut() = RecursionView {
            pegs: vec![
                Peg {
                    name: from,
                    disks: (1..=disks).rev().collect(),
                },
                Peg {
                    name: via,
                    disks: Vec::new(),
                },
                Peg {
                    name: to,
                    disks: Vec::new(),
                },
            ],
            ..Default::default()
        };

        if disks == 0 {
            self.state.finish(Some(0), "No disks to move");
            return Ok(Vec::new());
        }

        let call = Call::Hanoi {
            disks,
            from,
            to,
            via,
        };
        let count = self.evaluate(&run, call).await?;
        self.state.finish(
            Some(count),
            format!("Moved {} disks from {} to {} in {} moves", disks, from, to, count),
        );
        Ok(self.state.view().moves.clone())
    }

    async fn evaluate(&mut self, run: &RunToken, root: Call) -> Result<u64> {
        let mut frames = vec![self.enter(run, root, None, 0).await?];
        let mut result = 0;

        while let Some(frame) = frames.last_mut() {
            if let Some(child) = frame.pending.next() {
                let (parent, level) = (frame.id, frame.level + 1);
                let child = self.enter(run, child, Some(parent), level).await?;
                frames.push(child);
                continue;
            }
            if let Some(done) = frames.pop() {
                result = self.leave(run, done).await?;
                if let Some(caller) = frames.last_mut() {
                    caller.results.push(result);
                }
            }
        }
        Ok(result)
    }

    async fn enter(
        &mut self,
        run: &RunToken,
        call: Call,
        parent: Option<StepId>,
        level: usize,
    ) -> Result<Frame> {
        let children = call.children();
        let base = children.is_empty();
        let label = call.label();
        self.state.view_mut().call_stack.push(label.clone());

        let description = match call {
            Call::Hanoi {
                disks: 1, from, to, ..
            } => self.move_disk(from, to),
            Call::Hanoi {
                disks, from, to, ..
            } => format!("Move {} disks from {} to {}", disks, from, to),
            _ if base => format!("{} is a base case", label),
            _ => format!("Call {}", label),
        };

        let kind = if base { CallKind::BaseCase } else { CallKind::Call };
        let snapshot = self.state.view().clone();
        let id = self
            .state
            .add_call(kind, level, snapshot, description, parent);
        self.state.set_status(id, CallStatus::Active);
        self.state.wait(run).await?;

        Ok(Frame {
            call,
            id,
            level,
            pending: children.into_iter(),
            results: Vec::new(),
            base,
        })
    }

    async fn leave(&mut self, run: &RunToken, frame: Frame) -> Result<u64> {
        if !frame.base {
            self.state.set_status(frame.id, CallStatus::Returning);
            self.state.wait(run).await?;
        }
        let result = frame.call.result(&frame.results)?;
        self.state.view_mut().call_stack.pop();
        self.state.complete_call(frame.id, result);
        Ok(result)
    }

    /// Apply one disk move to the pegs; returns its description
    fn move_disk(&mut self, from: char, to: char) -> String {
        let view = self.state.view_mut();
        let disk = view.peg_mut(from).and_then(|peg| peg.disks.pop());
        let Some(disk) = disk else {
            return format!("Peg {} is empty", from);
        };
        if let Some(peg) = view.peg_mut(to) {
            peg.disks.push(disk);
        }
        view.moves.push(HanoiMove { disk, from, to });
        format!("Move disk {} from {} to {}", disk, from, to)
    }
}

impl Default for RecursionDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for RecursionDriver {
    type Family = Recursion;

    fn container(&self) -> &StateContainer<Recursion> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<Recursion> {
        &mut self.state
    }
}
