//! Integration tests for the geometric tools
//!
//! Hull tests follow the polyhedra and sphere clouds classically used for
//! Quickhull; surface tests follow the cylinder and sphere scenarios of the
//! projection workflow (inner sphere, radial projection, nearest surface point).

use approx::{assert_abs_diff_eq, assert_relative_eq};
use math_geometric_tools::{
    GeometryConfig, GeometryError, HullResult, Point3, build_scene, cartesian_to_spherical,
    compute_convex_hull, compute_convex_hull_with_config, compute_inner_sphere,
    compute_triangle_barycenters, compute_triangle_normals, interp_vertices_values_at_closest,
    interp_vertices_values_to_triangles, project_to_sphere, project_to_surface, query_closest,
    spherical_to_cartesian, testdata, triangle_mesh_by_convex_hull_of_inner_sphere,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every input point must lie on or behind every outward hull face
fn assert_contains_all(hull: &HullResult, points: &[Point3]) {
    let normals = compute_triangle_normals(&hull.mesh, true).expect("hull faces are non-degenerate");

    for (t, n) in normals.iter().enumerate() {
        let [a, _, _] = hull.mesh.triangle_points(t);
        for p in points {
            let d = n.dot(&p.sub(&a));
            assert!(d <= 1e-9, "point {p} is {d:e} outside face {t}");
        }
    }
}

/// Helper function to run a hull test and print its summary
fn run_hull_test(name: &str, vertices: Vec<Point3>, expected_min_faces: usize) -> HullResult {
    init_logger();
    println!("\n=== Test: {} ===", name);
    println!("Input vertices: {}", vertices.len());

    let hull = compute_convex_hull(&vertices).expect("Failed to build convex hull");

    let num_faces = hull.mesh.num_triangles();
    let num_vertices = hull.mesh.num_vertices();
    let volume = hull.mesh.volume();
    let surface_area = hull.mesh.surface_area();

    println!("Output faces: {}", num_faces);
    println!("Output vertices: {}", num_vertices);
    println!("Volume: {:.6}", volume);
    println!("Surface area: {:.6}", surface_area);

    // Verify basic properties
    assert!(
        num_faces >= expected_min_faces,
        "Expected at least {} faces, got {}",
        expected_min_faces,
        num_faces
    );
    assert!(num_vertices >= 4, "Convex hull must have at least 4 vertices");
    assert!(volume > 0.0, "Volume must be positive");
    assert!(surface_area > 0.0, "Surface area must be positive");

    // Closed triangulated sphere: F = 2V - 4
    assert_eq!(num_faces, 2 * num_vertices - 4);

    // Index map points back at the input
    for (k, &i) in hull.indices.iter().enumerate() {
        assert_eq!(hull.mesh.vertices()[k], vertices[i]);
    }
    assert!(hull.indices.windows(2).all(|w| w[0] < w[1]));

    assert_contains_all(&hull, &vertices);
    hull
}

#[test]
fn test_tetrahedron() {
    let hull = run_hull_test("tetrahedron", testdata::tetrahedron_vertices(), 4);
    assert_eq!(hull.mesh.num_triangles(), 4);
    assert_relative_eq!(hull.mesh.volume(), 2.0_f64.sqrt() / 12.0, epsilon = 1e-12);
}

#[test]
fn test_cube() {
    let hull = run_hull_test("cube", testdata::cube_vertices(2.0), 12);
    assert_eq!(hull.mesh.num_triangles(), 12);
    assert_relative_eq!(hull.mesh.volume(), 8.0, epsilon = 1e-9);
    assert_relative_eq!(hull.mesh.surface_area(), 24.0, epsilon = 1e-9);
}

#[test]
fn test_octahedron() {
    let hull = run_hull_test("octahedron", testdata::octahedron_vertices(), 8);
    assert_eq!(hull.mesh.num_triangles(), 8);
    assert_eq!(hull.indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_icosahedron() {
    let hull = run_hull_test("icosahedron", testdata::icosahedron_vertices(), 20);
    assert_eq!(hull.mesh.num_triangles(), 20);
    assert_eq!(hull.mesh.num_vertices(), 12);
}

#[test]
fn test_random_sphere_936() {
    let vertices = testdata::random_sphere_points(936, 1.0, 936);
    run_hull_test("rand_sph_936", vertices, 100);
}

#[test]
fn test_fibonacci_840_sphere() {
    let vertices = testdata::fibonacci_sphere_points(840, 1.0);
    let hull = run_hull_test("fibonacci_840_sph", vertices, 500);
    // Every point of a sphere is extreme
    assert_eq!(hull.indices.len(), 840);
}

#[test]
fn test_cube_with_interior_1000() {
    let vertices = testdata::cube_with_interior_points(2.0, 1000, 1000);
    let hull = run_hull_test("cube_interior_1000", vertices, 12);
    assert_eq!(hull.indices, (0..8).collect::<Vec<_>>());
    assert_eq!(hull.mesh.num_triangles(), 12);
}

#[test]
fn test_hull_is_deterministic() {
    let vertices = testdata::random_sphere_points(500, 2.0, 17);
    let first = compute_convex_hull(&vertices).unwrap();
    let second = compute_convex_hull(&vertices).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_hull_tolerance_from_config() {
    let config = GeometryConfig::from_json(r#"{ "epsilon": 1e-6 }"#).unwrap();
    let mut vertices = testdata::cube_vertices(2.0);
    // Within tolerance of the +x face: not a hull vertex
    vertices.push(Point3::new(1.0 + 1e-8, 0.2, 0.3));

    let hull = compute_convex_hull_with_config(&vertices, &config).unwrap();
    assert_eq!(hull.indices, (0..8).collect::<Vec<_>>());
}

#[test]
fn test_hull_degenerate_inputs() {
    let flat: Vec<Point3> = (0..10)
        .map(|i| Point3::new(i as f64, (i * i) as f64, 0.0))
        .collect();
    assert!(matches!(
        compute_convex_hull(&flat),
        Err(GeometryError::DegenerateGeometry(_))
    ));

    let three = &testdata::tetrahedron_vertices()[..3];
    assert!(matches!(
        compute_convex_hull(three),
        Err(GeometryError::DegenerateGeometry(_))
    ));
}

#[test]
fn test_octahedron_inner_sphere_and_hull() {
    init_logger();
    let points = testdata::octahedron_vertices();

    let sphere = compute_inner_sphere(&points).unwrap();
    assert_abs_diff_eq!(sphere.center.magnitude(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(sphere.radius, 1.0);

    let on_sphere = project_to_sphere(&points, sphere.center, sphere.radius / 2.0).unwrap();
    let hull = compute_convex_hull(&on_sphere).unwrap();
    assert_eq!(hull.mesh.num_triangles(), 8);
    assert_eq!(hull.indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_flat_square_query() {
    init_logger();
    let mesh = testdata::unit_square_mesh();
    let scene = build_scene(&mesh).unwrap();

    let closest = query_closest(&scene, &[Point3::new(0.25, 0.75, 1.0)]).unwrap();
    assert_relative_eq!(closest[0].point.x, 0.25);
    assert_relative_eq!(closest[0].point.y, 0.75);
    assert_abs_diff_eq!(closest[0].point.z, 0.0);
    assert_relative_eq!(closest[0].distance(), 1.0);

    // Sample a linear field at the projected point
    let values: Vec<f64> = mesh.vertices().iter().map(|p| 2.0 * p.x + p.y).collect();
    let sampled = interp_vertices_values_at_closest(&mesh, &values, &closest).unwrap();
    assert_relative_eq!(sampled[0], 1.25, epsilon = 1e-12);
}

#[test]
fn test_cylinder_projection_workflow() {
    init_logger();
    let radius = 1.0;
    let half_height = 1.0;
    let resolution = 20;
    let cylinder = testdata::cylinder_mesh(radius, 2.0 * half_height, resolution, 4);
    let scene = build_scene(&cylinder).unwrap();

    let sphere = compute_inner_sphere(cylinder.vertices()).unwrap();
    assert_abs_diff_eq!(sphere.center.magnitude(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(sphere.radius, 1.0, epsilon = 1e-12);

    let on_sphere =
        project_to_sphere(cylinder.vertices(), sphere.center, sphere.radius / 2.0).unwrap();
    let projected = project_to_surface(&scene, &on_sphere).unwrap();
    assert_eq!(projected.len(), cylinder.num_vertices());

    // Side faces of the polygonal prism sit between the apothem and the radius
    let apothem = radius * (std::f64::consts::PI / resolution as f64).cos();
    for p in &projected {
        let r = p.x.hypot(p.y);
        let on_cap = (p.z.abs() - half_height).abs() < 1e-12 && r <= radius + 1e-12;
        let on_side = p.z.abs() <= half_height + 1e-12 && r >= apothem - 1e-12 && r <= radius + 1e-12;
        assert!(on_cap || on_side, "{p} is not on the cylinder surface");
    }

    // Cap centers project straight up and down
    assert_relative_eq!(projected[0].z, half_height, epsilon = 1e-12);
    assert_relative_eq!(projected[1].z, -half_height, epsilon = 1e-12);
}

#[test]
fn test_inner_sphere_pipeline_on_original_coordinates() {
    init_logger();
    let points = testdata::cylinder_mesh(1.0, 2.0, 20, 4).vertices().to_vec();

    let hull = triangle_mesh_by_convex_hull_of_inner_sphere(&points).unwrap();
    assert_eq!(hull.indices.len(), points.len());
    assert_eq!(hull.mesh.num_triangles(), 2 * points.len() - 4);

    let surface = hull.with_original_vertices(&points).unwrap();
    assert_eq!(surface.triangles(), hull.mesh.triangles());
    for (k, &i) in hull.indices.iter().enumerate() {
        assert_eq!(surface.vertices()[k], points[i]);
    }
    assert!(surface.volume() > 0.0);
}

#[test]
fn test_normals_on_sphere() {
    let mesh = testdata::uv_sphere_mesh(1.0, 10);
    let normals = compute_triangle_normals(&mesh, true).unwrap();
    let centers = compute_triangle_barycenters(&mesh);

    assert_eq!(normals.len(), mesh.num_triangles());
    for (n, c) in normals.iter().zip(&centers) {
        // Outward and nearly radial
        assert!(n.dot(&c.normalize().unwrap()) > 0.9);
    }

    let heights: Vec<f64> = mesh.vertices().iter().map(|v| v.z).collect();
    let per_triangle = interp_vertices_values_to_triangles(&mesh, &heights).unwrap();
    for (h, c) in per_triangle.iter().zip(&centers) {
        assert_relative_eq!(*h, c.z, epsilon = 1e-12);
    }
}

#[test]
fn test_coords_roundtrip() {
    let points = testdata::random_sphere_points(100, 3.0, 5);
    let spherical = cartesian_to_spherical(&points);
    for s in &spherical {
        assert!((0.0..=std::f64::consts::PI).contains(&s.theta));
        assert!((-std::f64::consts::PI..=std::f64::consts::PI).contains(&s.phi));
    }

    let back = spherical_to_cartesian(&spherical);
    for (p, q) in points.iter().zip(&back) {
        assert_abs_diff_eq!(p.distance(q), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_all_tests_summary() {
    println!("\n========================================");
    println!("CONVEX HULL TEST SUITE SUMMARY");
    println!("========================================");

    let test_cases: Vec<(&str, Box<dyn Fn() -> Vec<Point3>>)> = vec![
        ("Tetrahedron", Box::new(testdata::tetrahedron_vertices)),
        ("Cube", Box::new(|| testdata::cube_vertices(2.0))),
        ("Octahedron", Box::new(testdata::octahedron_vertices)),
        ("Icosahedron", Box::new(testdata::icosahedron_vertices)),
        (
            "Random Sphere 936",
            Box::new(|| testdata::random_sphere_points(936, 1.0, 1)),
        ),
        (
            "Fibonacci 180",
            Box::new(|| testdata::fibonacci_sphere_points(180, 1.0)),
        ),
        (
            "Cylinder vertices",
            Box::new(|| testdata::cylinder_mesh(1.0, 2.0, 20, 4).vertices().to_vec()),
        ),
    ];

    let mut success_count = 0;
    let mut total_count = 0;

    for (name, gen_fn) in test_cases {
        total_count += 1;
        let vertices = gen_fn();
        match compute_convex_hull(&vertices) {
            Ok(hull) => {
                success_count += 1;
                println!(
                    "✓ {}: {} vertices → {} faces",
                    name,
                    vertices.len(),
                    hull.mesh.num_triangles()
                );
            }
            Err(e) => {
                println!("✗ {}: Failed with error: {}", name, e);
            }
        }
    }

    println!("========================================");
    println!("Success rate: {}/{}", success_count, total_count);
    println!("========================================");

    assert_eq!(success_count, total_count, "All tests should pass");
}
