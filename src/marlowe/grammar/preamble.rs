//! Run preamble grammars: banner, title, target description, beam and run control.

use chumsky::prelude::*;

use super::{header, rows1};
use crate::marlowe::terms::labels::{
    CONTROL_LABELS, CRYSTAL_STRUCTURES, INELASTIC_MODELS, INELASTIC_PARAMETERS, POTENTIALS,
    SURFACE_TYPES,
};
use crate::marlowe::terms::{
    element, eol, flag, float, float3, int, label, number, phrase, rest_of_line, word, Number,
    Terminal,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub version: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Title(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct Crystal {
    pub structure: &'static str,
    pub constants: [f64; 3],
    pub angles: [f64; 3],
    pub cell_atoms: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub kind: i64,
    pub symbol: &'static str,
    pub z: i64,
    pub mass: f64,
    pub binding: f64,
    pub cutoff: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Potential {
    pub pair: (&'static str, &'static str),
    pub name: &'static str,
    pub screening_length: f64,
    pub cutoff_radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inelastic {
    pub model: &'static str,
    pub parameters: Vec<(&'static str, Number)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub kind: &'static str,
    pub normal: Option<[i64; 3]>,
    pub binding: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    pub symbol: &'static str,
    pub energy: f64,
    pub direction: [f64; 3],
}

/// A run-control value: either a switch or a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    Flag(bool),
    Number(Number),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlEntry {
    pub label: &'static str,
    pub value: Setting,
}

/// `Program MARLOWE, Version v` / `Run Date d Time t`
pub fn banner() -> Terminal<Banner> {
    phrase("Program MARLOWE, Version")
        .ignore_then(word())
        .then_ignore(eol())
        .then_ignore(phrase("Run Date"))
        .then(word())
        .then_ignore(phrase("Time"))
        .then(word())
        .then_ignore(eol())
        .map(|((version, date), time)| Banner {
            version,
            date,
            time,
        })
        .boxed()
}

pub fn title() -> Terminal<Title> {
    phrase("Title:")
        .ignore_then(rest_of_line())
        .then_ignore(just('\n'))
        .map(Title)
        .boxed()
}

pub fn crystal() -> Terminal<Crystal> {
    phrase("Crystal Structure:")
        .ignore_then(label(CRYSTAL_STRUCTURES))
        .then_ignore(eol())
        .then_ignore(phrase("Lattice Constants"))
        .then(float3())
        .then_ignore(eol())
        .then_ignore(phrase("Lattice Angles"))
        .then(float3())
        .then_ignore(eol())
        .then_ignore(phrase("Unit Cell Atoms"))
        .then(int(6))
        .then_ignore(eol())
        .map(|(((structure, constants), angles), cell_atoms)| Crystal {
            structure,
            constants,
            angles,
            cell_atoms,
        })
        .boxed()
}

pub fn components() -> Terminal<Vec<Component>> {
    let row = int(4)
        .then(element())
        .then(int(4))
        .then(float())
        .then(float())
        .then(float())
        .map(|(((((kind, symbol), z), mass), binding), cutoff)| Component {
            kind,
            symbol,
            z,
            mass,
            binding,
            cutoff,
        })
        .boxed();
    header("Target Components")
        .ignore_then(header("Kind Symbol Z Mass Binding Cutoff"))
        .ignore_then(rows1(row))
        .boxed()
}

pub fn potentials() -> Terminal<Vec<Potential>> {
    let row = element()
        .then_ignore(just('-'))
        .then(element())
        .then(label(POTENTIALS))
        .then(float())
        .then(float())
        .map(|((((a, b), name), screening_length), cutoff_radius)| Potential {
            pair: (a, b),
            name,
            screening_length,
            cutoff_radius,
        })
        .boxed();
    header("Interatomic Potentials")
        .ignore_then(header("Pair Potential Screening Length Cutoff Radius"))
        .ignore_then(rows1(row))
        .boxed()
}

pub fn inelastic() -> Terminal<Inelastic> {
    let parameter = label(INELASTIC_PARAMETERS).then(number()).boxed();
    phrase("Inelastic Energy Loss:")
        .ignore_then(label(INELASTIC_MODELS))
        .then_ignore(eol())
        .then(parameter.then_ignore(eol()).repeated())
        .map(|(model, parameters)| Inelastic { model, parameters })
        .boxed()
}

pub fn surface() -> Terminal<Surface> {
    let normal = phrase("Surface Normal")
        .ignore_then(int(3))
        .then(int(3))
        .then(int(3))
        .then_ignore(eol())
        .map(|((h, k), l)| [h, k, l]);
    let binding = phrase("Surface Binding Energy")
        .ignore_then(float())
        .then_ignore(eol());
    phrase("Target Surface:")
        .ignore_then(label(SURFACE_TYPES))
        .then_ignore(eol())
        .then(normal.or_not())
        .then(binding.or_not())
        .map(|((kind, normal), binding)| Surface {
            kind,
            normal,
            binding,
        })
        .boxed()
}

pub fn beam() -> Terminal<Beam> {
    phrase("Primary Particle:")
        .ignore_then(element())
        .then_ignore(eol())
        .then_ignore(phrase("Energy"))
        .then(float())
        .then_ignore(phrase("eV"))
        .then_ignore(eol())
        .then_ignore(phrase("Direction Cosines"))
        .then(float3())
        .then_ignore(eol())
        .map(|((symbol, energy), direction)| Beam {
            symbol,
            energy,
            direction,
        })
        .boxed()
}

pub fn control() -> Terminal<Vec<ControlEntry>> {
    let value = flag()
        .map(Setting::Flag)
        .or(number().map(Setting::Number));
    let row = label(CONTROL_LABELS)
        .then(value)
        .map(|(label, value)| ControlEntry { label, value })
        .boxed();
    header("Run Control").ignore_then(rows1(row)).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marlowe::terms::parse_all;

    #[test]
    fn banner_fields() {
        let text = "Program MARLOWE, Version 15b\nRun Date 2019-04-30   Time 13:45:12\n";
        assert_eq!(
            parse_all(banner(), text),
            Ok(Banner {
                version: "15b".into(),
                date: "2019-04-30".into(),
                time: "13:45:12".into(),
            })
        );
    }

    #[test]
    fn title_keeps_inner_spacing() {
        assert_eq!(
            parse_all(title(), "Title:   5 keV Cu  into Cu\n"),
            Ok(Title("5 keV Cu  into Cu".into()))
        );
    }

    #[test]
    fn crystal_block() {
        let text = "Crystal Structure: Simple Cubic\n\
                    Lattice Constants 3.6150 3.6150 3.6150\n\
                    Lattice Angles 90.0 90.0 90.0\n\
                    Unit Cell Atoms 1\n";
        let crystal = parse_all(crystal(), text).unwrap();
        assert_eq!(crystal.structure, "Simple Cubic");
        assert_eq!(crystal.angles, [90.0; 3]);
        assert_eq!(crystal.cell_atoms, 1);
    }

    #[test]
    fn potentials_prefer_the_longer_name() {
        let text = "Interatomic Potentials\n\
                    Pair Potential Screening Length Cutoff Radius\n\
                    Cu-Au Ziegler-Biersack-Littmark Universal 0.0852 2.5500\n\
                    Au-Au Ziegler-Biersack-Littmark 0.0700 2.6000\n";
        let rows = parse_all(potentials(), text).unwrap();
        assert_eq!(rows[0].pair, ("Cu", "Au"));
        assert_eq!(rows[0].name, "Ziegler-Biersack-Littmark Universal");
        assert_eq!(rows[1].name, "Ziegler-Biersack-Littmark");
        assert_eq!(rows[1].cutoff_radius, 2.6);
    }

    #[test]
    fn components_need_a_row() {
        let text = "Target Components\nKind Symbol Z Mass Binding Cutoff\n";
        assert!(parse_all(components(), text).is_err());
    }

    #[test]
    fn surface_lines_are_optional() {
        let bare = parse_all(surface(), "Target Surface: Rough\n").unwrap();
        assert_eq!(bare.normal, None);
        assert_eq!(bare.binding, None);
        let full = parse_all(
            surface(),
            "Target Surface: Planar\nSurface Normal  0 0-1\nSurface Binding Energy 3.5\n",
        )
        .unwrap();
        assert_eq!(full.normal, Some([0, 0, -1]));
        assert_eq!(full.binding, Some(3.5));
    }

    #[test]
    fn control_mixes_flags_and_numbers() {
        let text = "Run Control\n\
                    Number of Cascades 2\n\
                    Detailed Reporting Yes\n\
                    Cutoff Energy for Recoils 5.0\n\
                    Cutoff Energy 0.5\n";
        let entries = parse_all(control(), text).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].value, Setting::Number(Number::Int(2)));
        assert_eq!(entries[1].value, Setting::Flag(true));
        assert_eq!(entries[2].label, "Cutoff Energy for Recoils");
        assert_eq!(entries[3].label, "Cutoff Energy");
    }

    #[test]
    fn inelastic_parameters_are_optional() {
        let model = parse_all(inelastic(), "Inelastic Energy Loss: Lindhard-Scharff Nonlocal\n")
            .unwrap();
        assert_eq!(model.model, "Lindhard-Scharff Nonlocal");
        assert!(model.parameters.is_empty());
    }
}
