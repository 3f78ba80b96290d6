/// One activity-to-activity mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MigrationInstruction {
    pub source_activity_id: String,
    pub target_activity_id: String,
    /// Re-evaluate the event trigger (timer, message, ...) of the target activity.
    pub update_event_trigger: bool,
}

impl MigrationInstruction {
    pub fn new(
        source_activity_id: impl Into<String>,
        target_activity_id: impl Into<String>,
        update_event_trigger: bool,
    ) -> Self {
        Self {
            source_activity_id: source_activity_id.into(),
            target_activity_id: target_activity_id.into(),
            update_event_trigger,
        }
    }
}

/// A mapping between two versions of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    pub source_process_definition_id: String,
    pub target_process_definition_id: String,
    pub instructions: Vec<MigrationInstruction>,
}

impl MigrationPlan {
    pub fn new(
        source_process_definition_id: impl Into<String>,
        target_process_definition_id: impl Into<String>,
        instructions: Vec<MigrationInstruction>,
    ) -> Self {
        Self {
            source_process_definition_id: source_process_definition_id.into(),
            target_process_definition_id: target_process_definition_id.into(),
            instructions,
        }
    }

    pub fn builder(
        source_process_definition_id: impl Into<String>,
        target_process_definition_id: impl Into<String>,
    ) -> MigrationPlanBuilder {
        MigrationPlanBuilder {
            plan: Self::new(source_process_definition_id, target_process_definition_id, Vec::new()),
        }
    }
}

/// Fluent construction of a [`MigrationPlan`].
///
/// `update_event_trigger()` applies to the most recently mapped activity pair.
#[derive(Debug, Clone)]
pub struct MigrationPlanBuilder {
    plan: MigrationPlan,
}

impl MigrationPlanBuilder {
    pub fn map_activities(
        mut self,
        source_activity_id: impl Into<String>,
        target_activity_id: impl Into<String>,
    ) -> Self {
        self.plan.instructions.push(MigrationInstruction::new(
            source_activity_id,
            target_activity_id,
            false,
        ));
        self
    }

    /// Map every id in `activity_ids` onto the equally named target activity.
    pub fn map_equal_activities<I, S>(mut self, activity_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in activity_ids {
            let id = id.into();
            self = self.map_activities(id.clone(), id);
        }
        self
    }

    pub fn update_event_trigger(mut self) -> Self {
        if let Some(last) = self.plan.instructions.last_mut() {
            last.update_event_trigger = true;
        }
        self
    }

    pub fn build(self) -> MigrationPlan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_mapping_order() {
        let plan = MigrationPlan::builder("invoice:1", "invoice:2")
            .map_activities("approve", "approveInvoice")
            .map_equal_activities(["pay", "archive"])
            .build();

        let sources: Vec<_> = plan
            .instructions
            .iter()
            .map(|i| i.source_activity_id.as_str())
            .collect();
        assert_eq!(sources, vec!["approve", "pay", "archive"]);
        assert_eq!(plan.instructions[1].target_activity_id, "pay");
    }

    #[test]
    fn update_event_trigger_applies_to_last_mapping() {
        let plan = MigrationPlan::builder("a:1", "a:2")
            .map_activities("timer", "timer")
            .map_activities("msg", "msg")
            .update_event_trigger()
            .build();

        assert!(!plan.instructions[0].update_event_trigger);
        assert!(plan.instructions[1].update_event_trigger);
    }

    #[test]
    fn update_event_trigger_without_mapping_is_ignored() {
        let plan = MigrationPlan::builder("a:1", "a:2").update_event_trigger().build();
        assert!(plan.instructions.is_empty());
    }
}
