// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Passport service: enrollment, participation and tier upkeep

use crate::documents;
use crate::error::ServiceError;
use crate::executor::Executor;
use chrono::Datelike;
use ideaflow_core::{
    passport_number, Actor, Clock, DomainError, Effect, Event, IdGen, Participation,
    ParticipationType, PassportApplication, PublishedEvent, Student, Tier, UnitId, EVENTS,
    PARTICIPATIONS, STUDENTS,
};
use ideaflow_storage::{DocumentStore, Filter, Precondition};

/// Participations are keyed by student and event, so a student is counted
/// at most once per event
pub fn participation_id(passport_number: &str, event_id: &str) -> String {
    format!("{passport_number}~{event_id}")
}

/// Keeps students, participations and tiers in step
#[derive(Clone)]
pub struct PassportService<S, C, I> {
    store: S,
    clock: C,
    id_gen: I,
    executor: Executor<S>,
}

impl<S, C, I> PassportService<S, C, I>
where
    S: DocumentStore,
    C: Clock,
    I: IdGen,
{
    pub fn new(store: S, clock: C, id_gen: I) -> Self {
        Self {
            executor: Executor::new(store.clone()),
            store,
            clock,
            id_gen,
        }
    }

    /// Enroll the applicant as a student with a fresh passport number
    pub fn approve_application(
        &self,
        application: PassportApplication,
        actor: &Actor,
    ) -> Result<Student, ServiceError> {
        let span = tracing::info_span!("passport.approve_application", actor = %actor.name);
        let _guard = span.enter();

        actor.authorize(UnitId::Passport, &application.university)?;
        let year = self.clock.now().year();
        let (student, effects) = documents::insert(&self.store, STUDENTS, || {
            let number = passport_number(year, &self.id_gen.next());
            let (student, effects) =
                Student::enroll(number.as_str(), application.clone(), &self.clock)?;
            Ok((number, student, effects))
        })?;
        self.executor.execute_all(effects)?;

        tracing::info!(passport = %student.passport_number, "enrolled");
        Ok(student)
    }

    /// Credit a student with one published event
    pub fn record_participation(
        &self,
        passport_number: &str,
        event_id: &str,
        participation_type: ParticipationType,
        notes: &str,
    ) -> Result<Participation, ServiceError> {
        let span =
            tracing::info_span!("passport.record", passport = passport_number, event = event_id);
        let _guard = span.enter();

        self.get_student(passport_number)?;
        documents::load::<_, PublishedEvent>(&self.store, EVENTS, "event", event_id)?;

        let participation = Participation {
            id: participation_id(passport_number, event_id),
            passport_number: passport_number.to_string(),
            event_id: event_id.to_string(),
            participation_type,
            notes: notes.to_string(),
            recorded_at: self.clock.now(),
        };
        match self.store.put(
            PARTICIPATIONS,
            &participation.id,
            documents::encode(&participation)?,
            Precondition::Absent,
        ) {
            Ok(_) => {}
            Err(e) if e.is_conflict() => {
                return Err(DomainError::validation(format!(
                    "participation of {passport_number} in {event_id} is already recorded"
                ))
                .into());
            }
            Err(e) => return Err(e.into()),
        }

        let counted = documents::update(
            &self.store,
            STUDENTS,
            "student",
            passport_number,
            |student: &Student| Ok(student.record_event(event_id)),
        );
        let (student, effects) = match counted {
            Ok(counted) => counted,
            Err(e) => {
                // Undo the participation so a retry starts clean
                if let Err(undo) = self.store.delete(PARTICIPATIONS, &participation.id) {
                    tracing::error!(error = %undo, "could not undo participation");
                }
                return Err(e);
            }
        };
        self.executor.execute_all(effects)?;

        tracing::info!(tier = %student.tier, total_events = student.total_events, "recorded");
        Ok(participation)
    }

    /// Remove a participation and uncount its event
    pub fn remove_participation(&self, participation_id: &str) -> Result<Student, ServiceError> {
        let span = tracing::info_span!("passport.remove", participation = participation_id);
        let _guard = span.enter();

        let participation = documents::load::<_, Participation>(
            &self.store,
            PARTICIPATIONS,
            "participation",
            participation_id,
        )?
        .value;
        let (student, effects) = self.uncount(&participation)?;
        self.executor.execute_all(effects)?;

        tracing::info!(tier = %student.tier, total_events = student.total_events, "removed");
        Ok(student)
    }

    /// Admin override of a student's tier, held until their event count changes
    pub fn override_tier(
        &self,
        passport_number: &str,
        tier: Tier,
        actor: &Actor,
    ) -> Result<Student, ServiceError> {
        let span =
            tracing::info_span!("passport.override_tier", passport = passport_number, %tier);
        let _guard = span.enter();

        let (student, effects) = documents::update(
            &self.store,
            STUDENTS,
            "student",
            passport_number,
            |student: &Student| student.override_tier(tier, actor),
        )?;
        self.executor.execute_all(effects)?;
        Ok(student)
    }

    /// Delete a student together with all of their participations
    pub fn delete_student(&self, passport_number: &str, actor: &Actor) -> Result<(), ServiceError> {
        let span = tracing::info_span!("passport.delete_student", passport = passport_number);
        let _guard = span.enter();

        if !actor.is_admin() {
            return Err(DomainError::permission(format!(
                "{} may not delete students",
                actor.name
            ))
            .into());
        }
        self.get_student(passport_number)?;

        let participations = self.participations_for(passport_number)?;
        for participation in &participations {
            let (_, effects) = self.uncount(participation)?;
            self.executor.execute_all(effects)?;
        }
        self.store.delete(STUDENTS, passport_number)?;
        self.executor
            .execute(Effect::Emit(Event::StudentDeleted {
                passport_number: passport_number.to_string(),
            }))?;

        tracing::info!(participations = participations.len(), "deleted");
        Ok(())
    }

    /// Decrement the student's count, then delete the participation.
    ///
    /// The count is restored if the delete fails, so the student's total
    /// always matches their stored participations and a retry finds the
    /// participation again.
    fn uncount(
        &self,
        participation: &Participation,
    ) -> Result<(Student, Vec<Effect>), ServiceError> {
        let (student, effects) = documents::update(
            &self.store,
            STUDENTS,
            "student",
            &participation.passport_number,
            |student: &Student| Ok(student.remove_event(&participation.event_id)),
        )?;
        if let Err(e) = self.store.delete(PARTICIPATIONS, &participation.id) {
            let recounted = documents::update(
                &self.store,
                STUDENTS,
                "student",
                &participation.passport_number,
                |student: &Student| Ok(student.record_event(&participation.event_id)),
            );
            if let Err(undo) = recounted {
                tracing::error!(error = %undo, "could not recount participation");
            }
            return Err(e.into());
        }
        Ok((student, effects))
    }

    pub fn get_student(&self, passport_number: &str) -> Result<Student, ServiceError> {
        let student =
            documents::load::<_, Student>(&self.store, STUDENTS, "student", passport_number)?;
        Ok(student.value)
    }

    /// A student's participations, ordered by id
    pub fn participations_for(
        &self,
        passport_number: &str,
    ) -> Result<Vec<Participation>, ServiceError> {
        documents::list(
            &self.store,
            PARTICIPATIONS,
            &Filter::all().where_eq("passportNumber", passport_number),
        )
    }
}

#[cfg(test)]
#[path = "passport_tests.rs"]
mod tests;
