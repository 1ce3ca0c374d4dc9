//! Ortholog group registry and membership
//!
//! A gene's `ortholog_group` and the group's member set are two views of
//! one relation. Every mutation below updates both.

use super::database::Database;
use crate::errors::{CoexprError, Result};
use crate::model::{FamilyId, GeneId, GroupId, OrthologGroup};

const SINGLETON_PREFIX: &str = "singleton:";

impl Database {
    /// Register an explicit group for an external family
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a group already holds the family, even
    /// one it was merged into.
    pub fn add_ortholog_group(&mut self, family: FamilyId) -> Result<GroupId> {
        let group = OrthologGroup::explicit(family);
        if self.family_index.contains_key(&group.name) || self.group_index.contains_key(&group.name)
        {
            return Err(CoexprError::AlreadyExists {
                kind: "ortholog group",
                name: group.name,
            });
        }
        self.push_group(group)
    }

    /// The group currently holding an external family
    pub fn ortholog_group_by_family(&self, family: &FamilyId) -> Option<GroupId> {
        self.family_index.get(&family.to_string()).copied()
    }

    /// # Errors
    ///
    /// Returns `OrthologGroupNotFound` if the slot is empty or out of range.
    pub fn ortholog_group(&self, id: GroupId) -> Result<&OrthologGroup> {
        self.groups
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| CoexprError::OrthologGroupNotFound {
                group: id.to_string(),
            })
    }

    pub fn ortholog_group_by_name(&self, name: &str) -> Option<(GroupId, &OrthologGroup)> {
        let id = *self.group_index.get(name)?;
        self.groups[id.index()].as_ref().map(|g| (id, g))
    }

    /// Live groups in slot order
    pub fn ortholog_groups(&self) -> impl Iterator<Item = (GroupId, &OrthologGroup)> {
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_ref().map(|g| (GroupId::from_index(i), g)))
    }

    pub fn ortholog_group_count(&self) -> usize {
        self.group_index.len()
    }

    /// Groups containing `gene`
    pub fn ortholog_groups_of(&self, gene: GeneId) -> impl Iterator<Item = GroupId> + '_ {
        self.genes[gene.index()].ortholog_group.into_iter()
    }

    /// Add a gene to a group
    ///
    /// Returns `false` if the gene already was a member.
    ///
    /// # Errors
    ///
    /// Returns `OrthologGroupNotFound` for a dead group and
    /// `InvariantViolation` if the gene belongs to another group; merge the
    /// groups instead.
    pub fn add_to_ortholog_group(&mut self, group: GroupId, gene: GeneId) -> Result<bool> {
        self.ortholog_group(group)?;
        match self.genes[gene.index()].ortholog_group {
            Some(current) if current == group => return Ok(false),
            Some(current) => {
                return Err(CoexprError::InvariantViolation {
                    reason: format!(
                        "gene {} already belongs to ortholog group {}",
                        self.genes[gene.index()].name,
                        self.group_name(current)
                    ),
                })
            }
            None => {}
        }
        self.genes[gene.index()].ortholog_group = Some(group);
        if let Some(g) = self.groups[group.index()].as_mut() {
            g.genes.insert(gene);
        }
        Ok(true)
    }

    /// Move all genes and external ids of `from` into `into` and delete `from`
    ///
    /// # Errors
    ///
    /// Returns `OrthologGroupNotFound` if either group is dead.
    pub fn merge_ortholog_groups(&mut self, into: GroupId, from: GroupId) -> Result<()> {
        self.ortholog_group(into)?;
        self.ortholog_group(from)?;
        if into == from {
            return Ok(());
        }
        let absorbed = self.take_group(from)?;
        for gene in &absorbed.genes {
            self.genes[gene.index()].ortholog_group = Some(into);
        }
        let target = self.groups[into.index()]
            .as_mut()
            .ok_or_else(|| CoexprError::OrthologGroupNotFound {
                group: into.to_string(),
            })?;
        target.genes.extend(absorbed.genes);
        for family in absorbed.external_ids {
            self.family_index.insert(family.to_string(), into);
            target.external_ids.insert(family);
        }
        Ok(())
    }

    /// Dissolve the singleton group of `gene`, leaving the gene ungrouped
    ///
    /// Returns whether a singleton was dissolved. Explicit groups are left
    /// alone.
    pub fn release_singleton(&mut self, gene: GeneId) -> bool {
        let Some(current) = self.genes[gene.index()].ortholog_group else {
            return false;
        };
        if !self.ortholog_group(current).is_ok_and(OrthologGroup::is_singleton) {
            return false;
        }
        if self.take_group(current).is_err() {
            return false;
        }
        self.genes[gene.index()].ortholog_group = None;
        true
    }

    /// Delete a group if it has no members
    ///
    /// Returns whether the group was removed.
    pub fn remove_ortholog_group_if_empty(&mut self, group: GroupId) -> bool {
        let empty = self.ortholog_group(group).is_ok_and(|g| g.is_empty());
        empty && self.take_group(group).is_ok()
    }

    /// Drop every ortholog group and clear all gene memberships
    pub fn erase_families(&mut self) {
        self.groups.clear();
        self.group_index.clear();
        self.family_index.clear();
        self.next_singleton = 0;
        for gene in &mut self.genes {
            gene.ortholog_group = None;
        }
    }

    /// Put every gene without a group into a fresh singleton group
    ///
    /// Genes are visited in creation order, so names are deterministic.
    /// Returns the number of groups created.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the group arena cannot take another group.
    pub fn assign_singleton_groups(&mut self) -> Result<usize> {
        let orphans: Vec<GeneId> = self
            .genes()
            .filter(|(_, g)| g.ortholog_group.is_none())
            .map(|(id, _)| id)
            .collect();
        for &gene in &orphans {
            let name = self.next_singleton_name();
            let id = self.push_group(OrthologGroup::singleton(name, gene))?;
            self.genes[gene.index()].ortholog_group = Some(id);
        }
        Ok(orphans.len())
    }

    fn next_singleton_name(&mut self) -> String {
        loop {
            let name = format!("{}{}", SINGLETON_PREFIX, self.next_singleton);
            self.next_singleton += 1;
            if !self.group_index.contains_key(&name) && !self.family_index.contains_key(&name) {
                return name;
            }
        }
    }

    fn group_name(&self, id: GroupId) -> &str {
        self.groups
            .get(id.index())
            .and_then(Option::as_ref)
            .map_or("<removed>", |g| g.name.as_str())
    }

    fn push_group(&mut self, group: OrthologGroup) -> Result<GroupId> {
        let id = GroupId::next_id(self.groups.len())?;
        self.group_index.insert(group.name.clone(), id);
        for family in &group.external_ids {
            self.family_index.insert(family.to_string(), id);
        }
        self.groups.push(Some(group));
        Ok(id)
    }

    fn take_group(&mut self, id: GroupId) -> Result<OrthologGroup> {
        let group = self
            .groups
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or_else(|| CoexprError::OrthologGroupNotFound {
                group: id.to_string(),
            })?;
        self.group_index.remove(&group.name);
        for family in &group.external_ids {
            if self.family_index.get(&family.to_string()) == Some(&id) {
                self.family_index.remove(&family.to_string());
            }
        }
        Ok(group)
    }
}
