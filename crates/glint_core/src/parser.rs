//! Scene description parser.
//!
//! The format is a whitespace-separated token stream:
//!
//! ```text
//! 3
//! amb: 0.1 0.1 0.1
//! sphere
//! pos: 0 0 -5
//! rad: 1
//! dif: 0.8 0.2 0.2
//! spe: 1 1 1
//! shi: 20
//! light
//! pos: 0 10 0
//! col: 1 1 1
//! triangle
//! pos: ... nor: ... dif: ... spe: ... shi: ...   (three times)
//! ```
//!
//! The first token is the number of objects that follow the ambient record.
//! Object keywords and field labels are matched case-insensitively. Any
//! unexpected token aborts the whole parse; there is no partial scene.

use glint_math::DVec3;
use log::{debug, trace};
use thiserror::Error;

use crate::scene::{CapacityError, Color, Light, Scene, SceneLimits, Sphere, Triangle, Vertex};

/// Errors that can occur during scene parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at line {line}: expected '{expected}', found '{found}'")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Unexpected end of file (expected {0})")]
    UnexpectedEof(&'static str),

    #[error("Invalid number '{token}' at line {line}")]
    InvalidNumber { line: usize, token: String },

    #[error("Unknown object type '{name}' at line {line}")]
    UnknownObject { line: usize, name: String },

    #[error("Object at line {line} rejected: {source}")]
    Capacity {
        line: usize,
        #[source]
        source: CapacityError,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    line: usize,
    text: &'a str,
}

/// Scene description parser.
pub struct SceneParser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    limits: SceneLimits,
}

impl<'a> SceneParser<'a> {
    /// Create a new parser from file contents.
    pub fn new(content: &'a str) -> Self {
        let tokens = content
            .lines()
            .enumerate()
            .flat_map(|(i, line)| {
                line.split_whitespace()
                    .map(move |text| Token { line: i + 1, text })
            })
            .collect();

        Self {
            tokens,
            position: 0,
            limits: SceneLimits::default(),
        }
    }

    /// Override the default capacity limits.
    pub fn with_limits(mut self, limits: SceneLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Parse the whole description.
    ///
    /// Tokens after the declared number of objects are ignored.
    pub fn parse(&mut self) -> ParseResult<Scene> {
        let count = self.parse_count()?;
        debug!("number of objects: {}", count);

        let ambient = self.parse_triple("amb:")?;
        let mut scene = Scene::with_limits(self.limits).with_ambient(ambient);

        for _ in 0..count {
            let keyword = self.next_token("object type")?;
            debug!("{}", keyword.text);

            if keyword.text.eq_ignore_ascii_case("triangle") {
                let triangle = self.parse_triangle()?;
                scene
                    .add_triangle(triangle)
                    .map_err(|source| capacity(keyword, source))?;
            } else if keyword.text.eq_ignore_ascii_case("sphere") {
                let sphere = self.parse_sphere()?;
                scene
                    .add_sphere(sphere)
                    .map_err(|source| capacity(keyword, source))?;
            } else if keyword.text.eq_ignore_ascii_case("light") {
                let light = self.parse_light()?;
                scene
                    .add_light(light)
                    .map_err(|source| capacity(keyword, source))?;
            } else {
                return Err(ParseError::UnknownObject {
                    line: keyword.line,
                    name: keyword.text.to_string(),
                });
            }
        }

        if self.position < self.tokens.len() {
            debug!(
                "ignoring {} tokens after the last object",
                self.tokens.len() - self.position
            );
        }

        Ok(scene)
    }

    fn parse_triangle(&mut self) -> ParseResult<Triangle> {
        let v0 = self.parse_vertex()?;
        let v1 = self.parse_vertex()?;
        let v2 = self.parse_vertex()?;
        Ok(Triangle::new(v0, v1, v2))
    }

    fn parse_vertex(&mut self) -> ParseResult<Vertex> {
        let position = self.parse_triple("pos:")?;
        let normal = self.parse_triple("nor:")?;
        let diffuse = self.parse_triple("dif:")?;
        let specular = self.parse_triple("spe:")?;
        let shininess = self.parse_scalar("shi:")?;

        Ok(Vertex {
            position,
            normal,
            diffuse,
            specular,
            shininess,
        })
    }

    fn parse_sphere(&mut self) -> ParseResult<Sphere> {
        let center = self.parse_triple("pos:")?;
        let radius = self.parse_scalar("rad:")?;
        let diffuse = self.parse_triple("dif:")?;
        let specular = self.parse_triple("spe:")?;
        let shininess = self.parse_scalar("shi:")?;

        Ok(Sphere {
            center,
            radius,
            diffuse,
            specular,
            shininess,
        })
    }

    fn parse_light(&mut self) -> ParseResult<Light> {
        let position = self.parse_triple("pos:")?;
        let color: Color = self.parse_triple("col:")?;
        Ok(Light::new(position, color))
    }

    fn parse_count(&mut self) -> ParseResult<usize> {
        let token = self.next_token("object count")?;
        token.text.parse().map_err(|_| ParseError::InvalidNumber {
            line: token.line,
            token: token.text.to_string(),
        })
    }

    /// Parse `label x y z`.
    fn parse_triple(&mut self, label: &'static str) -> ParseResult<DVec3> {
        self.expect_label(label)?;
        let x = self.parse_number(label)?;
        let y = self.parse_number(label)?;
        let z = self.parse_number(label)?;
        trace!("{} {} {} {}", label, x, y, z);
        Ok(DVec3::new(x, y, z))
    }

    /// Parse `label value`.
    fn parse_scalar(&mut self, label: &'static str) -> ParseResult<f64> {
        self.expect_label(label)?;
        let value = self.parse_number(label)?;
        trace!("{} {}", label, value);
        Ok(value)
    }

    fn expect_label(&mut self, label: &'static str) -> ParseResult<()> {
        let token = self.next_token(label)?;
        if !token.text.eq_ignore_ascii_case(label) {
            return Err(ParseError::UnexpectedToken {
                line: token.line,
                expected: label,
                found: token.text.to_string(),
            });
        }
        Ok(())
    }

    fn parse_number(&mut self, label: &'static str) -> ParseResult<f64> {
        let token = self.next_token(label)?;
        token.text.parse().map_err(|_| ParseError::InvalidNumber {
            line: token.line,
            token: token.text.to_string(),
        })
    }

    fn next_token(&mut self, expected: &'static str) -> ParseResult<Token<'a>> {
        let token = self
            .tokens
            .get(self.position)
            .copied()
            .ok_or(ParseError::UnexpectedEof(expected))?;
        self.position += 1;
        Ok(token)
    }
}

fn capacity(keyword: Token<'_>, source: CapacityError) -> ParseError {
    ParseError::Capacity {
        line: keyword.line,
        source,
    }
}

/// Parse a scene description with the default limits.
pub fn parse_scene(content: &str) -> ParseResult<Scene> {
    SceneParser::new(content).parse()
}

/// Parse a scene description with custom limits.
pub fn parse_scene_with_limits(content: &str, limits: SceneLimits) -> ParseResult<Scene> {
    SceneParser::new(content).with_limits(limits).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectKind;

    const SPHERE_AND_LIGHT: &str = "2
amb: 0.1 0.2 0.3
sphere
pos: 0.0 0.0 -5.0
rad: 1.5
dif: 0.8 0.2 0.2
spe: 1.0 1.0 1.0
shi: 20
light
pos: 0 10 0
col: 1 0.9 0.8
";

    const TRIANGLE: &str = "1
amb: 0 0 0
triangle
pos: -1 -1 -2 nor: 0 0 1 dif: 1 0 0 spe: 0 0 0 shi: 1
pos: 1 -1 -2 nor: 0 0 1 dif: 0 1 0 spe: 0 0 0 shi: 2
pos: 0 1 -2 nor: 0 0 1 dif: 0 0 1 spe: 0.5 0.5 0.5 shi: 3
";

    #[test]
    fn test_parse_sphere_and_light() {
        let scene = parse_scene(SPHERE_AND_LIGHT).unwrap();

        assert_eq!(scene.ambient, DVec3::new(0.1, 0.2, 0.3));
        assert_eq!(scene.spheres().len(), 1);
        assert_eq!(scene.lights().len(), 1);
        assert!(scene.triangles().is_empty());

        let sphere = scene.spheres()[0];
        assert_eq!(sphere.center, DVec3::new(0.0, 0.0, -5.0));
        assert_eq!(sphere.radius, 1.5);
        assert_eq!(sphere.diffuse, DVec3::new(0.8, 0.2, 0.2));
        assert_eq!(sphere.specular, DVec3::ONE);
        assert_eq!(sphere.shininess, 20.0);

        let light = scene.lights()[0];
        assert_eq!(light.position, DVec3::new(0.0, 10.0, 0.0));
        assert_eq!(light.color, DVec3::new(1.0, 0.9, 0.8));
    }

    #[test]
    fn test_parse_triangle_keeps_vertex_order() {
        let scene = parse_scene(TRIANGLE).unwrap();
        let tri = scene.triangles()[0];

        assert_eq!(tri.vertices[0].position, DVec3::new(-1.0, -1.0, -2.0));
        assert_eq!(tri.vertices[1].diffuse, DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(tri.vertices[2].specular, DVec3::splat(0.5));
        assert_eq!(tri.vertices[2].shininess, 3.0);
        assert_eq!(tri.vertices[1].normal, DVec3::Z);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let content = "1\nAMB: 0 0 0\nLight\nPos: 1 2 3\nCOL: 1 1 1\n";
        let scene = parse_scene(content).unwrap();
        assert_eq!(scene.lights()[0].position, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_unknown_object() {
        let content = "1\namb: 0 0 0\ncube\npos: 0 0 0\n";
        match parse_scene(content) {
            Err(ParseError::UnknownObject { line, name }) => {
                assert_eq!(line, 3);
                assert_eq!(name, "cube");
            }
            other => panic!("expected UnknownObject, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_label() {
        let content = "1\namb: 0 0 0\nsphere\npos: 0 0 0\nradius: 1\n";
        match parse_scene(content) {
            Err(ParseError::UnexpectedToken {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 5);
                assert_eq!(expected, "rad:");
                assert_eq!(found, "radius:");
            }
            other => panic!("expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_number() {
        let content = "1\namb: 0 zero 0\n";
        assert!(matches!(
            parse_scene(content),
            Err(ParseError::InvalidNumber { line: 2, .. })
        ));

        assert!(matches!(
            parse_scene("-1\namb: 0 0 0\n"),
            Err(ParseError::InvalidNumber { line: 1, .. })
        ));
    }

    #[test]
    fn test_truncated_input() {
        let content = "2\namb: 0 0 0\nlight\npos: 0 0 0\ncol: 1 1 1\n";
        assert!(matches!(
            parse_scene(content),
            Err(ParseError::UnexpectedEof("object type"))
        ));

        assert!(matches!(
            parse_scene("1\namb: 0 0"),
            Err(ParseError::UnexpectedEof("amb:"))
        ));

        assert!(matches!(parse_scene(""), Err(ParseError::UnexpectedEof(_))));
    }

    #[test]
    fn test_capacity_limit() {
        let limits = SceneLimits {
            max_lights: 0,
            ..SceneLimits::default()
        };

        match parse_scene_with_limits(SPHERE_AND_LIGHT, limits) {
            Err(ParseError::Capacity { line, source }) => {
                assert_eq!(line, 9);
                assert_eq!(source.kind, ObjectKind::Light);
            }
            other => panic!("expected Capacity, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tokens_ignored() {
        let content = format!("{}\nsphere garbage", SPHERE_AND_LIGHT);
        let scene = parse_scene(&content).unwrap();
        assert_eq!(scene.object_count(), 2);
    }

    #[test]
    fn test_parser_carries_limits_into_scene() {
        let limits = SceneLimits {
            max_triangles: 5,
            max_spheres: 5,
            max_lights: 5,
        };
        let scene = parse_scene_with_limits(SPHERE_AND_LIGHT, limits).unwrap();
        assert_eq!(scene.limits(), limits);
    }
}
