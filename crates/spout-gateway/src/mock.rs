//! Recording test doubles for the backend and timeline seams.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::backend::{ReceiverBackend, ResourceState, SenderBackend, SenderInfo};
use crate::fence::GpuTimeline;
use crate::handle::ResourceHandle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    SetOutboundName(String),
    CreateView { resource: usize, view: u32 },
    ReleaseView(u32),
    Send(u32),
    ReleaseSender,
    CloseSession,
    Signal(u64),
    Wait(u64),
    ReleaseFence,
    SetInboundName(String),
    Receive(Option<u32>),
    CreateBacking { width: u32, height: u32, backing: u32 },
    ReleaseBacking(u32),
    ReleaseReceiver,
}

#[derive(Default)]
pub(crate) struct State {
    pub events: Vec<Event>,
    pub timeouts: Vec<Option<Duration>>,
    next_id: u32,

    pub reject_name: bool,
    pub fail_create: bool,
    pub fail_send: bool,

    pub fail_signal: bool,
    pub fail_wait: bool,
    pub gpu_done_on_signal: bool,
    completed: u64,

    pub sender: Option<SenderInfo>,
    pub pending_update: bool,
    updated: bool,
    pub fail_backing: bool,
}

/// Shared event log; every double created from the same log records into it.
#[derive(Clone, Default)]
pub(crate) struct Log(Rc<RefCell<State>>);

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, f: impl FnOnce(&mut State)) {
        f(&mut self.0.borrow_mut());
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn timeouts(&self) -> Vec<Option<Duration>> {
        self.0.borrow().timeouts.clone()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().events.clear();
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().events.push(event);
    }

    fn next_id(&self) -> u32 {
        let mut state = self.0.borrow_mut();
        state.next_id += 1;
        state.next_id
    }
}

pub(crate) fn handle(addr: usize) -> ResourceHandle {
    ResourceHandle::from_addr(addr).unwrap()
}

// =====================================================================
// Sender side
// =====================================================================

pub(crate) struct MockView {
    pub id: u32,
    log: Log,
}

impl Drop for MockView {
    fn drop(&mut self) {
        self.log.push(Event::ReleaseView(self.id));
    }
}

pub(crate) struct MockSender {
    log: Log,
}

impl MockSender {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl SenderBackend for MockSender {
    type View = MockView;

    fn set_outbound_name(&mut self, name: &str) -> bool {
        self.log.push(Event::SetOutboundName(name.to_string()));
        !self.log.0.borrow().reject_name
    }

    fn create_view(&mut self, resource: ResourceHandle, state: ResourceState) -> Option<MockView> {
        assert_eq!(state, ResourceState::RenderTarget);
        if self.log.0.borrow().fail_create {
            return None;
        }
        let id = self.log.next_id();
        self.log.push(Event::CreateView {
            resource: resource.addr(),
            view: id,
        });
        Some(MockView {
            id,
            log: self.log.clone(),
        })
    }

    fn send_view(&mut self, view: &MockView) -> bool {
        self.log.push(Event::Send(view.id));
        !self.log.0.borrow().fail_send
    }

    fn release_sender(&mut self) {
        self.log.push(Event::ReleaseSender);
    }

    fn close_session(&mut self) {
        self.log.push(Event::CloseSession);
    }
}

pub(crate) struct MockTimeline {
    log: Log,
}

impl MockTimeline {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl GpuTimeline for MockTimeline {
    fn signal(&mut self, value: u64) -> Result<()> {
        let mut state = self.log.0.borrow_mut();
        if state.fail_signal {
            bail!("device removed");
        }
        state.events.push(Event::Signal(value));
        if state.gpu_done_on_signal {
            state.completed = value;
        }
        Ok(())
    }

    fn completed_value(&self) -> u64 {
        self.log.0.borrow().completed
    }

    fn wait_for(&mut self, value: u64, timeout: Option<Duration>) -> Result<()> {
        let mut state = self.log.0.borrow_mut();
        state.events.push(Event::Wait(value));
        state.timeouts.push(timeout);
        if state.fail_wait {
            bail!("timed out");
        }
        // The GPU catches up while we block.
        state.completed = state.completed.max(value);
        Ok(())
    }
}

impl Drop for MockTimeline {
    fn drop(&mut self) {
        self.log.push(Event::ReleaseFence);
    }
}

// =====================================================================
// Receiver side
// =====================================================================

pub(crate) struct MockBacking {
    pub id: u32,
    log: Log,
}

impl Drop for MockBacking {
    fn drop(&mut self) {
        self.log.push(Event::ReleaseBacking(self.id));
    }
}

pub(crate) struct MockReceiver {
    log: Log,
}

impl MockReceiver {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl ReceiverBackend for MockReceiver {
    type Backing = MockBacking;

    fn set_inbound_name(&mut self, name: &str) {
        self.log.push(Event::SetInboundName(name.to_string()));
    }

    fn receive_into(&mut self, target: Option<&MockBacking>) -> bool {
        let mut state = self.log.0.borrow_mut();
        state.events.push(Event::Receive(target.map(|b| b.id)));
        if state.sender.is_none() {
            state.updated = false;
            return false;
        }
        state.updated = std::mem::take(&mut state.pending_update);
        true
    }

    fn is_updated(&self) -> bool {
        self.log.0.borrow().updated
    }

    fn sender_info(&self) -> SenderInfo {
        self.log.0.borrow().sender.unwrap_or_default()
    }

    fn create_backing(&mut self, info: &SenderInfo, state: ResourceState) -> Option<MockBacking> {
        assert_eq!(state, ResourceState::CopyDest);
        if self.log.0.borrow().fail_backing {
            return None;
        }
        let id = self.log.next_id();
        self.log.push(Event::CreateBacking {
            width: info.width,
            height: info.height,
            backing: id,
        });
        Some(MockBacking {
            id,
            log: self.log.clone(),
        })
    }

    fn backing_handle(backing: &MockBacking) -> Option<ResourceHandle> {
        ResourceHandle::from_addr(0x10_000 + backing.id as usize)
    }

    fn release_receiver(&mut self) {
        self.log.push(Event::ReleaseReceiver);
    }

    fn close_session(&mut self) {
        self.log.push(Event::CloseSession);
    }
}
