use crate::domain::event::{normalize_event_description, AgeGroup, EventKey, EventSex, Stroke};
use crate::utils::error::{ConvertError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDefinition {
    pub number: u16,
    pub sex: EventSex,
    pub ages: AgeGroup,
    pub distance: u16,
    pub stroke: Stroke,
}

impl EventDefinition {
    pub fn legs(&self) -> usize {
        self.stroke.legs()
    }

    pub fn description(&self) -> String {
        format!(
            "#{} {} {} {} {}",
            self.number,
            self.sex.label(),
            self.ages.label(),
            self.distance,
            self.stroke.label()
        )
    }

    fn matches(&self, key: &EventKey) -> bool {
        self.distance == key.distance
            && self.stroke == key.stroke
            && key.sex.map_or(true, |sex| sex == self.sex)
            && key.ages.map_or(true, |ages| ages == self.ages)
    }
}

/// Facts about the swimmer(s) that help pick an event when the description
/// leaves out sex or age bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchHint {
    pub sex: Option<EventSex>,
    pub age: Option<u8>,
}

/// The meet's ordered event list. Event numbers are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTable {
    events: Vec<EventDefinition>,
}

const AGE_GROUPS: [AgeGroup; 5] = [
    AgeGroup::and_under(8),
    AgeGroup::range(9, 10),
    AgeGroup::range(11, 12),
    AgeGroup::range(13, 14),
    AgeGroup::range(15, 18),
];

impl EventTable {
    pub fn new(mut events: Vec<EventDefinition>) -> Result<Self> {
        events.sort_by_key(|e| e.number);
        if let Some(pair) = events.windows(2).find(|w| w[0].number == w[1].number) {
            return Err(ConvertError::ConfigValidationError {
                field: "events".to_string(),
                message: format!("event number {} is listed twice", pair[0].number),
            });
        }
        Ok(Self { events })
    }

    /// Standard summer-league dual meet: medley relays, the four strokes,
    /// IM, then free relays. Odd numbers are boys, even numbers girls.
    pub fn standard() -> Self {
        let mut events = Vec::with_capacity(64);
        let mut number = 1;
        let mut push_pair = |ages: AgeGroup, distance: u16, stroke: Stroke| {
            for sex in [EventSex::Male, EventSex::Female] {
                events.push(EventDefinition {
                    number,
                    sex,
                    ages,
                    distance,
                    stroke,
                });
                number += 1;
            }
        };

        for ages in AGE_GROUPS {
            let distance = if ages == AgeGroup::and_under(8) { 100 } else { 200 };
            push_pair(ages, distance, Stroke::MedleyRelay);
        }
        for stroke in [
            Stroke::Freestyle,
            Stroke::Backstroke,
            Stroke::Breaststroke,
            Stroke::Butterfly,
        ] {
            for ages in AGE_GROUPS {
                let distance = if ages == AgeGroup::and_under(8) { 25 } else { 50 };
                push_pair(ages, distance, stroke);
            }
        }
        for ages in &AGE_GROUPS[1..] {
            push_pair(*ages, 100, Stroke::IndividualMedley);
        }
        for ages in [AgeGroup::range(11, 12), AgeGroup::range(13, 14), AgeGroup::OPEN] {
            push_pair(ages, 200, Stroke::FreeRelay);
        }

        Self { events }
    }

    /// Builds a table from `(number, description)` pairs. A description
    /// without sex is a mixed event; without an age bracket it is open.
    pub fn from_descriptions<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u16, &'a str)>,
    {
        let mut events = Vec::new();
        for (number, description) in entries {
            let key = normalize_event_description(description).ok_or_else(|| {
                ConvertError::ConfigValidationError {
                    field: format!("events[{}].description", number),
                    message: format!("cannot read event description \"{}\"", description),
                }
            })?;
            events.push(EventDefinition {
                number,
                sex: key.sex.unwrap_or(EventSex::Mixed),
                ages: key.ages.unwrap_or(AgeGroup::OPEN),
                distance: key.distance,
                stroke: key.stroke,
            });
        }
        Self::new(events)
    }

    pub fn events(&self) -> &[EventDefinition] {
        &self.events
    }

    pub fn get(&self, number: u16) -> Option<&EventDefinition> {
        self.events
            .binary_search_by_key(&number, |e| e.number)
            .ok()
            .map(|i| &self.events[i])
    }

    /// Finds the single event a free-form description refers to.
    ///
    /// Fields present in the description must match exactly. When several
    /// events remain, the hint narrows by sex and then by age, but only for
    /// whichever of the two the description left out.
    pub fn resolve(&self, description: &str, hint: MatchHint) -> Result<&EventDefinition> {
        let unknown = || ConvertError::UnknownEvent {
            description: description.trim().to_string(),
        };
        let key = normalize_event_description(description).ok_or_else(unknown)?;
        self.resolve_key(description, &key, hint)
    }

    pub fn resolve_key(
        &self,
        description: &str,
        key: &EventKey,
        hint: MatchHint,
    ) -> Result<&EventDefinition> {
        let mut candidates: Vec<&EventDefinition> =
            self.events.iter().filter(|e| e.matches(key)).collect();

        if candidates.len() > 1 && key.sex.is_none() {
            if let Some(sex) = hint.sex {
                candidates.retain(|e| e.sex == sex);
            }
        }
        if candidates.len() > 1 && key.ages.is_none() {
            if let Some(age) = hint.age {
                candidates.retain(|e| e.ages.contains(age));
            }
        }

        match candidates.as_slice() {
            [] => Err(ConvertError::UnknownEvent {
                description: description.trim().to_string(),
            }),
            [only] => Ok(only),
            many => Err(ConvertError::AmbiguousEvent {
                description: description.trim().to_string(),
                candidates: many
                    .iter()
                    .map(|e| e.description())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_shape() {
        let table = EventTable::standard();
        assert_eq!(table.events().len(), 64);
        let numbers: Vec<u16> = table.events().iter().map(|e| e.number).collect();
        assert_eq!(numbers, (1..=64).collect::<Vec<u16>>());

        let first = table.get(1).unwrap();
        assert_eq!(first.stroke, Stroke::MedleyRelay);
        assert_eq!(first.sex, EventSex::Male);
        assert_eq!(first.ages, AgeGroup::and_under(8));
        assert_eq!(first.distance, 100);

        let last = table.get(64).unwrap();
        assert_eq!(last.stroke, Stroke::FreeRelay);
        assert_eq!(last.ages, AgeGroup::OPEN);
        assert_eq!(last.sex, EventSex::Female);
    }

    #[test]
    fn test_resolve_with_swimmer_hint() {
        let table = EventTable::standard();
        let hint = MatchHint {
            sex: Some(EventSex::Female),
            age: Some(10),
        };
        let event = table.resolve("50 Freestyle", hint).unwrap();
        assert_eq!(event.number, 14);
        assert_eq!(event.ages, AgeGroup::range(9, 10));
        assert_eq!(event.sex, EventSex::Female);
    }

    #[test]
    fn test_explicit_fields_win_over_hint() {
        let table = EventTable::standard();
        let hint = MatchHint {
            sex: Some(EventSex::Male),
            age: Some(12),
        };
        let event = table.resolve("Girls 9-10 50 Back", hint).unwrap();
        assert_eq!(event.number, 24);
    }

    #[test]
    fn test_unknown_and_ambiguous() {
        let table = EventTable::standard();
        let err = table
            .resolve("200 Medley Freestyle", MatchHint::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnknownEvent { ref description } if description == "200 Medley Freestyle"));

        let err = table.resolve("50 Free", MatchHint::default()).unwrap_err();
        assert!(matches!(err, ConvertError::AmbiguousEvent { .. }));

        let err = table.resolve("400 Free", MatchHint::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownEvent { .. }));
    }

    #[test]
    fn test_custom_table_rejects_duplicates() {
        let err = EventTable::from_descriptions([(1, "Girls 50 Free"), (1, "Boys 50 Free")])
            .unwrap_err();
        assert!(err.to_string().contains("listed twice"));

        let table =
            EventTable::from_descriptions([(2, "50 Free"), (1, "Boys 8 & Under 25 Back")]).unwrap();
        assert_eq!(table.events()[0].number, 1);
        assert_eq!(table.get(2).unwrap().sex, EventSex::Mixed);
    }
}
