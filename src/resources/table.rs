/*!
 * Resource Table
 * Named resource instances with single-holder ownership
 */

use crate::core::types::{InstanceId, Pid};
use crate::core::Name;
use crate::process::Process;
use ahash::AHashMap;
use serde::Serialize;

/// One allocatable unit of a named resource class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInstance {
    pub name: Name,
    /// Process holding this instance; `None` means available
    pub holder: Option<Pid>,
}

impl ResourceInstance {
    #[inline]
    pub fn is_available(&self) -> bool {
        self.holder.is_none()
    }
}

/// Result of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    Acquired(InstanceId),
    Unavailable,
}

/// Result of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Released(InstanceId),
    NotHeld,
}

/// Resource instances in load order, with a name index
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceTable {
    instances: Vec<ResourceInstance>,
    #[serde(skip)]
    by_name: AHashMap<Name, Vec<InstanceId>>,
}

impl ResourceTable {
    /// Build from instance names; a repeated name adds another instance
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        let mut table = Self::default();
        for name in names {
            let name = name.into();
            let id = table.instances.len();
            table.by_name.entry(name.clone()).or_default().push(id);
            table.instances.push(ResourceInstance { name, holder: None });
        }
        table
    }

    /// Whether any instance of the class exists
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of instances of the class
    pub fn capacity(&self, name: &str) -> usize {
        self.by_name.get(name).map_or(0, Vec::len)
    }

    /// Number of instances of the class currently held
    pub fn held_count(&self, name: &str) -> usize {
        self.ids(name)
            .filter(|&id| !self.instances[id].is_available())
            .count()
    }

    /// Whether at least one instance of the class is free
    pub fn is_available(&self, name: &str) -> bool {
        self.ids(name).any(|id| self.instances[id].is_available())
    }

    pub fn get(&self, id: InstanceId) -> Option<&ResourceInstance> {
        self.instances.get(id)
    }

    /// All instances in table order
    pub fn instances(&self) -> &[ResourceInstance] {
        &self.instances
    }

    /// Names of free instances in table order (one entry per instance)
    pub fn available_names(&self) -> Vec<Name> {
        self.instances
            .iter()
            .filter(|r| r.is_available())
            .map(|r| r.name.clone())
            .collect()
    }

    /// Claim the first free instance of `name` for `process`.
    ///
    /// Unknown names behave like a class with no free instance.
    pub fn acquire(&mut self, process: &mut Process, name: &str) -> Acquire {
        let Some(id) = self.ids(name).find(|&id| self.instances[id].is_available()) else {
            return Acquire::Unavailable;
        };
        self.instances[id].holder = Some(process.pid());
        process.hold(id);
        Acquire::Acquired(id)
    }

    /// Return one instance of `name` from the process's held set
    pub fn release(&mut self, process: &mut Process, name: &str) -> Release {
        let Some(id) = process
            .held()
            .iter()
            .copied()
            .find(|&id| self.instances.get(id).is_some_and(|r| r.name == *name))
        else {
            return Release::NotHeld;
        };
        process.unhold(id);
        self.instances[id].holder = None;
        Release::Released(id)
    }

    /// Return every held instance to the pool
    pub fn release_all(&mut self, process: &mut Process) -> Vec<InstanceId> {
        let released = process.take_held();
        for &id in &released {
            if let Some(instance) = self.instances.get_mut(id) {
                instance.holder = None;
            }
        }
        released
    }

    fn ids<'a>(&'a self, name: &str) -> impl Iterator<Item = InstanceId> + 'a {
        self.by_name.get(name).into_iter().flatten().copied()
    }
}
