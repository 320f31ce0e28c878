//! Tiled 32x32x32 GEMM on the host, driving the fragment API the way a
//! kernel would: one simulated wavefront per 16x16 output tile, walking
//! the K dimension in 16-element steps.

use rand::Rng;
use rand_pcg::Pcg64Mcg;
use wavemma::config::{DataType, LayoutOrder, TileConfig};
use wavemma::layout::{ColMajor, RowMajor};
use wavemma::mapping::MappingUtil;
use wavemma::{f16, mma_sync, Accumulator, Fragment, MatrixA, MatrixB};

const M: usize = 32;
const N: usize = 32;
const K: usize = 32;
const TILE: usize = 16;
const WAVE: usize = 64;

type FragA = Fragment<MatrixA, TILE, TILE, TILE, f16, ColMajor, 4, 4>;
type FragB = Fragment<MatrixB, TILE, TILE, TILE, f16, RowMajor, 4, 4>;
type FragC = Fragment<Accumulator, TILE, TILE, TILE, f32, ColMajor, 4, 4>;

type MapA = MappingUtil<TILE, TILE, ColMajor>;
type MapB = MappingUtil<TILE, TILE, RowMajor>;
type MapC = MappingUtil<TILE, TILE, ColMajor>;

fn main() {
    tracing_subscriber::fmt::init();

    let config = TileConfig {
        block_dim: TILE,
        block_k: TILE,
        data_type: DataType::F16,
        layout: LayoutOrder::ColMajor,
        vector_width: 4,
    };
    config.validate(WAVE).expect("tile configuration");
    tracing::info!(
        max_vw = config.max_vector_width(WAVE),
        "running {M}x{N}x{K} in {TILE}-element tiles"
    );

    let mut rng = Pcg64Mcg::new(0xbeef);
    let a_host: Vec<f64> = (0..M * K).map(|_| rng.gen_range(-8i32..8) as f64).collect();
    let b_host: Vec<f64> = (0..K * N).map(|_| rng.gen_range(-8i32..8) as f64).collect();

    // A column-major (ld = M), B row-major (ld = N), C column-major (ld = M).
    let mut a_buf = vec![f16::from_f64(0.0); M * K];
    for r in 0..M {
        for c in 0..K {
            a_buf[c * M + r] = f16::from_f64(a_host[r * K + c]);
        }
    }
    let b_buf: Vec<f16> = b_host.iter().map(|&x| f16::from_f64(x)).collect();
    let mut c_buf = vec![0.0f32; M * N];

    for m_tile in 0..M / TILE {
        for n_tile in 0..N / TILE {
            let mut accs = vec![FragC::new(); WAVE];

            for k_tile in 0..K / TILE {
                let a_off = MapA::tile_offset(m_tile, k_tile, M);
                let b_off = MapB::tile_offset(k_tile, n_tile, N);

                let mut a_frags = vec![FragA::new(); WAVE];
                let mut b_frags = vec![FragB::new(); WAVE];
                for thread_x in 0..WAVE {
                    let lane = MapA::lane_id(thread_x);
                    a_frags[thread_x].load_matrix_sync(&a_buf[a_off..], M, lane);
                    b_frags[thread_x].load_matrix_sync(&b_buf[b_off..], N, lane);
                }
                mma_sync(&mut accs, &a_frags, &b_frags);
            }

            let c_off = MapC::tile_offset(m_tile, n_tile, M);
            for thread_x in 0..WAVE {
                let lane = MapC::lane_id(thread_x);
                accs[thread_x].store_matrix_sync(&mut c_buf[c_off..], M, lane);
            }
        }
    }

    let mut max_abs_diff = 0.0f32;
    for m in 0..M {
        for n in 0..N {
            let mut want = 0.0f64;
            for k in 0..K {
                want += a_host[m * K + k] * b_host[k * N + n];
            }
            let diff = (c_buf[n * M + m] - want as f32).abs();
            max_abs_diff = max_abs_diff.max(diff);
        }
    }

    tracing::info!(max_abs_diff, "done");
    assert_eq!(max_abs_diff, 0.0, "integer inputs must be exact");
    println!("32x32x32 tiled gemm matched the scalar reference");
}
