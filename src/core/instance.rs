//! TSP instance loading.
//!
//! Instance files use the same whitespace discipline as the log
//! formats: one city per line as `<id> <x> <y>`, with ids numbered
//! contiguously from 1. The instance feeds the annealer through a
//! precomputed Euclidean distance matrix indexed by `id - 1`.

use std::path::Path;

use super::error::{self, AppError};
use super::loader::ParseError;

/// Column count of the instance format.
const INSTANCE_COLUMNS: usize = 3;

/// One city of a TSP instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceNode {
    /// 1-based city id as written in the file
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

/// Parse an instance from text.
///
/// Ids must fall within `1..=node_count`; duplicate ids are not
/// detected beyond that range check.
pub fn parse_instance(content: &str) -> Result<Vec<InstanceNode>, ParseError> {
    let node_count = content.lines().count();
    let mut nodes = Vec::with_capacity(node_count);

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() < INSTANCE_COLUMNS {
            return Err(ParseError::MissingColumn {
                line: line_no,
                found: tokens.len(),
                expected: INSTANCE_COLUMNS,
            });
        }

        let id: u32 = tokens[0].parse().map_err(|_| ParseError::InvalidInteger {
            line: line_no,
            token: tokens[0].to_string(),
        })?;
        if id == 0 || id as usize > node_count {
            return Err(ParseError::InvalidNodeId {
                line: line_no,
                id,
                count: node_count,
            });
        }

        let x = parse_coord(tokens[1], line_no, 2)?;
        let y = parse_coord(tokens[2], line_no, 3)?;

        nodes.push(InstanceNode { id, x, y });
    }

    Ok(nodes)
}

/// Load an instance from a file.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Vec<InstanceNode>, AppError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| error::from_io_error(path.to_path_buf(), e))?;
    parse_instance(&content).map_err(|e| error::from_parse_error(Some(path.to_path_buf()), &e))
}

/// Build the symmetric Euclidean distance matrix for an instance.
///
/// Rows and columns are indexed by `id - 1`, so `matrix[a][b]` is the
/// distance between the cities with ids `a + 1` and `b + 1`. The
/// diagonal is zero.
pub fn distance_matrix(nodes: &[InstanceNode]) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; nodes.len()]; nodes.len()];
    for a in nodes {
        for b in nodes {
            let i = a.id as usize - 1;
            let j = b.id as usize - 1;
            let d = euclidean(a, b);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    matrix
}

fn euclidean(a: &InstanceNode, b: &InstanceNode) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

fn parse_coord(token: &str, line: usize, column: usize) -> Result<f64, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidFloat {
        line,
        column,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance_basic() {
        let content = "1 0 0\n2 3 4\n3 6 0\n";
        let nodes = parse_instance(content).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes[1],
            InstanceNode {
                id: 2,
                x: 3.0,
                y: 4.0
            }
        );
    }

    #[test]
    fn test_parse_instance_short_line() {
        let err = parse_instance("1 0 0\n2 3\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingColumn {
                line: 2,
                found: 2,
                expected: 3,
            }
        ));
    }

    #[test]
    fn test_parse_instance_id_out_of_range() {
        // Two lines, so id 5 cannot be a valid 1-based id.
        let err = parse_instance("1 0 0\n5 3 4\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNodeId {
                line: 2,
                id: 5,
                count: 2,
            }
        );
    }

    #[test]
    fn test_parse_instance_id_zero() {
        let err = parse_instance("0 1 1\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNodeId { id: 0, .. }));
    }

    #[test]
    fn test_distance_matrix_known_values() {
        // 3-4-5 triangle between ids 1 and 2.
        let nodes = parse_instance("1 0 0\n2 3 4\n").unwrap();
        let matrix = distance_matrix(&nodes);
        assert_eq!(matrix[0][1], 5.0);
        assert_eq!(matrix[1][0], 5.0);
    }

    #[test]
    fn test_distance_matrix_symmetric_zero_diagonal() {
        let nodes = parse_instance("1 0 0\n2 3 4\n3 6 0\n").unwrap();
        let matrix = distance_matrix(&nodes);
        for i in 0..3 {
            assert_eq!(matrix[i][i], 0.0);
            for j in 0..3 {
                assert_eq!(matrix[i][j], matrix[j][i]);
            }
        }
    }

    #[test]
    fn test_distance_matrix_ignores_file_order() {
        // Ids decide matrix position, not line order.
        let shuffled = parse_instance("2 3 4\n1 0 0\n").unwrap();
        let matrix = distance_matrix(&shuffled);
        assert_eq!(matrix[0][1], 5.0);
    }
}
