//! Commands for the Reminder Scheduling context.

use chrono::{DateTime, FixedOffset};
use reminders_core::command::Command;

use super::events::ReminderType;

/// A command addressed to an existing reminder.
pub trait ReminderCommand: Command {
    /// The reminder the command targets.
    fn reminder_id(&self) -> &str;
}

/// Command to schedule a new reminder on an intervention.
#[derive(Debug, Clone)]
pub struct ScheduleReminder {
    /// The intervention the reminder follows up on.
    pub intervention_id: String,
    /// What the reminder asks an operator to do.
    pub reminder_type: ReminderType,
    /// When the reminder is due.
    pub scheduled_time: DateTime<FixedOffset>,
}

/// Command to move a reminder to another time.
#[derive(Debug, Clone)]
pub struct RescheduleReminder {
    /// The reminder identifier.
    pub reminder_id: String,
    /// The new due time.
    pub scheduled_time: DateTime<FixedOffset>,
}

/// Command to make a cancelled or done reminder pending again.
#[derive(Debug, Clone)]
pub struct ReopenReminder {
    /// The reminder identifier.
    pub reminder_id: String,
}

/// Command to cancel a reminder.
#[derive(Debug, Clone)]
pub struct CancelReminder {
    /// The reminder identifier.
    pub reminder_id: String,
}

/// Command to complete a reminder.
#[derive(Debug, Clone)]
pub struct MarkReminderAsDone {
    /// The reminder identifier.
    pub reminder_id: String,
}

/// Command to assign a reminder to an operator.
#[derive(Debug, Clone)]
pub struct AssignReminder {
    /// The reminder identifier.
    pub reminder_id: String,
    /// The operator taking the reminder.
    pub operator: String,
}

/// Command to remove the operator of a reminder.
#[derive(Debug, Clone)]
pub struct UnassignReminder {
    /// The reminder identifier.
    pub reminder_id: String,
}

/// Command to hand a reminder over to another country.
#[derive(Debug, Clone)]
pub struct TransferReminder {
    /// The reminder identifier.
    pub reminder_id: String,
    /// The ISO country code of the receiving country.
    pub country: String,
}

impl Command for ScheduleReminder {
    fn command_type(&self) -> &'static str {
        "reminder.schedule"
    }
}

macro_rules! reminder_command {
    ($command:ty, $name:literal) => {
        impl Command for $command {
            fn command_type(&self) -> &'static str {
                $name
            }
        }

        impl ReminderCommand for $command {
            fn reminder_id(&self) -> &str {
                &self.reminder_id
            }
        }
    };
}

reminder_command!(RescheduleReminder, "reminder.reschedule");
reminder_command!(ReopenReminder, "reminder.reopen");
reminder_command!(CancelReminder, "reminder.cancel");
reminder_command!(MarkReminderAsDone, "reminder.mark_as_done");
reminder_command!(AssignReminder, "reminder.assign");
reminder_command!(UnassignReminder, "reminder.unassign");
reminder_command!(TransferReminder, "reminder.transfer");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_types_are_distinct() {
        let commands: Vec<Box<dyn Command>> = vec![
            Box::new(ScheduleReminder {
                intervention_id: "I1".to_owned(),
                reminder_type: ReminderType::CallCustomer,
                scheduled_time: DateTime::parse_from_rfc3339("2022-03-04T11:30:00Z").unwrap(),
            }),
            Box::new(ReopenReminder { reminder_id: "R1".to_owned() }),
            Box::new(CancelReminder { reminder_id: "R1".to_owned() }),
            Box::new(MarkReminderAsDone { reminder_id: "R1".to_owned() }),
            Box::new(UnassignReminder { reminder_id: "R1".to_owned() }),
        ];

        let mut types: Vec<&str> = commands.iter().map(|c| c.command_type()).collect();
        types.sort_unstable();
        types.dedup();

        assert_eq!(types.len(), 5);
    }

    #[test]
    fn test_reminder_command_exposes_target_id() {
        let command = AssignReminder {
            reminder_id: "R7".to_owned(),
            operator: "alice".to_owned(),
        };

        assert_eq!(command.reminder_id(), "R7");
        assert_eq!(command.command_type(), "reminder.assign");
    }
}
